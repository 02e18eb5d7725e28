//! Authentication boundary.
//!
//! The record service does NOT depend on any specific auth provider. It
//! only knows this trait: something that resolves request headers to a
//! user identity, or to nobody. The concrete implementation (JWT bearer
//! validation in the server binary) is injected at startup time.

use axum::http::HeaderMap;

use crate::ServiceError;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque user id, stamped onto records at creation.
    pub id: String,
    /// Display name, used for logging only.
    pub name: String,
}

/// Pluggable authenticator. Controllers call this on every request that
/// requires an identity.
///
/// Returns `Ok(None)` when the request carries no usable credentials;
/// controllers turn that into HTTP 401. `Err` is reserved for backend
/// failures while resolving credentials (a session store being down),
/// not for bad tokens.
pub trait Authenticator: Send + Sync + 'static {
    fn identify(&self, headers: &HeaderMap) -> Result<Option<Identity>, ServiceError>;
}

/// An authenticator that always resolves to a fixed identity. Used in tests.
pub struct StaticIdentity(pub Identity);

impl Authenticator for StaticIdentity {
    fn identify(&self, _headers: &HeaderMap) -> Result<Option<Identity>, ServiceError> {
        Ok(Some(self.0.clone()))
    }
}

/// An authenticator that never resolves anyone. Used in tests.
pub struct Anonymous;

impl Authenticator for Anonymous {
    fn identify(&self, _headers: &HeaderMap) -> Result<Option<Identity>, ServiceError> {
        Ok(None)
    }
}

/// Extract the value of a `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
