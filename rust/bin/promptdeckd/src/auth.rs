//! JWT bearer validation.
//!
//! The records module only knows the `Authenticator` trait; this binary
//! is where tokens are actually checked. Token issuance is a separate
//! service's job — we hold the verification secret only.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use promptdeck_core::auth::bearer_token;
use promptdeck_core::{Authenticator, Identity, ServiceError};
use serde::{Deserialize, Serialize};

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

impl Authenticator for JwtAuthenticator {
    /// A missing, malformed, or expired token resolves to nobody rather
    /// than an error; controllers decide whether that is acceptable for
    /// the route in question.
    fn identify(&self, headers: &HeaderMap) -> Result<Option<Identity>, ServiceError> {
        let Some(token) = bearer_token(headers) else {
            return Ok(None);
        };

        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(Identity {
                id: data.claims.sub,
                name: data.claims.name,
            })),
            Err(e) => {
                tracing::debug!("rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}
