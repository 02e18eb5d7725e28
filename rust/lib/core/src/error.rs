use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Clients match on these —
// never on the human-readable message string.

/// Stable error code constants shared across resources.
///
/// Clients should match on `code` from `{"code": "NOT_FOUND", "error": "..."}`.
/// Codes never change; messages may be reworded. Validation failures carry
/// field-specific codes (`MISSING_TAGS`, `INVALID_STATUS`, ...) defined next
/// to the resource schemas that produce them.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const INVALID_ID: &str = "INVALID_ID";
    pub const INVALID_BODY: &str = "INVALID_BODY";
    pub const INVALID_QUERY: &str = "INVALID_QUERY";
    pub const USER_ID_NOT_ALLOWED: &str = "USER_ID_NOT_ALLOWED";
    pub const INTEGRITY_ERROR: &str = "INTEGRITY_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL_ERROR";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified service error type used across all promptdeck modules.
///
/// Each variant maps to a stable error code and an HTTP status code. The
/// JSON response always includes both:
///
/// ```json
/// {"code": "MISSING_TAGS", "error": "Tags are required and must be a non-empty array"}
/// ```
///
/// Server-side failures (`Integrity`, `Storage`, `Internal`) are logged with
/// full detail and surfaced to the caller as a generic message — internal
/// error text never reaches the client.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed, missing, or forbidden input. HTTP 400.
    /// Carries the field-specific wire code.
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    /// Missing or invalid authentication. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not permitted. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// No matching row under the caller's visible scope. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// A required stored field failed to decode even though this system
    /// wrote it. HTTP 500.
    #[error("{0}")]
    Integrity(String),

    /// Storage backend failure. HTTP 500.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Construct a validation error with its wire code.
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            code,
            message: message.into(),
        }
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation { code, .. } => code,
            ServiceError::Unauthorized(_) => error_code::UNAUTHORIZED,
            ServiceError::Forbidden(_) => error_code::FORBIDDEN,
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Integrity(_) => error_code::INTEGRITY_ERROR,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Integrity(_)
            | ServiceError::Storage(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to echo to the client. Server-side failures collapse
    /// to a generic message; the detail stays in the log.
    pub fn client_message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.error_code(), detail = %self, "request failed");
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "error": self.client_message(),
        });
        (status, axum::Json(body)).into_response()
    }
}
