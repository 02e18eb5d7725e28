//! Shared infrastructure for promptdeck services.
//!
//! Error taxonomy with stable wire codes, the pluggable [`Authenticator`]
//! boundary, list/pagination helpers, and the [`Module`] trait the server
//! binary composes routes through.

pub mod auth;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use auth::{Anonymous, Authenticator, Identity, StaticIdentity};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use types::{
    clamp_limit, now_rfc3339, offset_or_default, DEFAULT_LIMIT, DEFAULT_ORG_ID, MAX_LIMIT,
};
