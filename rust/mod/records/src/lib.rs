//! The promptdeck records module.
//!
//! Multi-tenant CRUD over four resources — task specs, templates, runs,
//! and lessons — sharing one request validator, one ownership guard, and
//! one polymorphic-field codec. Encoded-string representations never leak
//! past the store: every response carries fully decoded fields.

pub mod api;
pub mod codec;
pub mod guard;
pub mod model;
pub mod store;
pub mod validator;

use std::sync::Arc;

use axum::Router;
use promptdeck_core::{Authenticator, Module, ServiceError};
use promptdeck_sql::SQLStore;

use api::AppState;
use store::RecordStore;

/// The records module — validation, scoping, and persistence for
/// task specs, templates, runs, and lessons.
pub struct RecordsModule {
    state: AppState,
}

impl RecordsModule {
    /// Create the module and initialise the storage schema.
    pub fn new(
        db: Arc<dyn SQLStore>,
        auth: Arc<dyn Authenticator>,
    ) -> Result<Self, ServiceError> {
        let store = Arc::new(RecordStore::new(db)?);
        Ok(Self {
            state: AppState { store, auth },
        })
    }

    /// Direct store access, for out-of-band work like seeding.
    pub fn store(&self) -> Arc<RecordStore> {
        self.state.store.clone()
    }
}

impl Module for RecordsModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::router(self.state.clone())
    }
}
