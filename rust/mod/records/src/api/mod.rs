//! HTTP controllers, one file per resource.
//!
//! Controllers parse bodies as raw JSON so the validator can see exactly
//! what the client sent (forbidden keys, partial updates, unrecognized
//! fields), then hand validated payloads to the store.

mod lessons;
mod runs;
mod task_specs;
mod templates;

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::{Json, Router};
use promptdeck_core::error::error_code;
use promptdeck_core::{Authenticator, Identity, ServiceError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub auth: Arc<dyn Authenticator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(task_specs::router())
        .merge(templates::router())
        .merge(runs::router())
        .merge(lessons::router())
        .with_state(state)
}

/// `Json<Value>` with the rejection folded into the error envelope.
/// axum's default rejection is a plain-text 400 that echoes parser
/// detail; clients expect `{"code","error"}` on every failure.
pub(super) struct Body(pub Value);

impl<S: Send + Sync> FromRequest<S> for Body {
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|_| {
            ServiceError::validation(error_code::INVALID_BODY, "Request body must be valid JSON")
        })?;
        Ok(Body(value))
    }
}

/// `Query<T>` with the rejection folded into the error envelope, for the
/// same reason as [`Body`].
pub(super) struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await.map_err(|_| {
            ServiceError::validation(error_code::INVALID_QUERY, "Invalid query parameters")
        })?;
        Ok(Params(value))
    }
}

/// Parse a path id. Anything that is not a positive integer is a client
/// error, reported in our own envelope rather than axum's.
fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ServiceError::validation(error_code::INVALID_ID, "Valid ID is required"))
}

/// Resolve the caller, requiring one to be present.
fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, ServiceError> {
    state
        .auth
        .identify(headers)?
        .ok_or_else(|| ServiceError::Unauthorized("Authentication required".to_string()))
}

/// Request bodies must be JSON objects.
fn body_object(body: &Value) -> Result<&Map<String, Value>, ServiceError> {
    body.as_object().ok_or_else(|| {
        ServiceError::validation(error_code::INVALID_BODY, "Request body must be a JSON object")
    })
}

/// Deserialize a typed creation payload from an already-validated body.
/// A failure here past the validator is still a client error (e.g. wrong
/// scalar type on a field no rule covers).
fn typed_payload<T: DeserializeOwned>(body: Value) -> Result<T, ServiceError> {
    serde_json::from_value(body).map_err(|_| {
        ServiceError::validation(error_code::INVALID_BODY, "Request body is malformed")
    })
}
