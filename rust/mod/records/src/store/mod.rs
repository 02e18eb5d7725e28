//! Record store adapter.
//!
//! Translates controller intents into SQL against the embedded store:
//! filter, sort, paginate, existence checks, insert-returning-id, and
//! single-statement guarded update/delete (the atomicity unit — two
//! concurrent mutations on one row cannot interleave partially).
//!
//! The encode/decode boundary for polymorphic fields lives here: rows go
//! in encoded and come out as fully decoded domain structs. Per-resource
//! operations are split across the sibling files.

mod lessons;
mod runs;
mod task_specs;
mod templates;

use std::sync::Arc;

use promptdeck_core::ServiceError;
use promptdeck_sql::{Row, SQLError, SQLStore, Value};

/// SQL schema for all four record tables.
///
/// References between tables are deliberately weak: `task_spec_id` is
/// checked against `task_specs` at write time by the controllers, and
/// deleting a referenced task spec leaves dangling ids behind.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS task_specs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             TEXT NOT NULL,
    org_id              INTEGER NOT NULL DEFAULT 1,
    family              TEXT NOT NULL,
    goal                TEXT NOT NULL,
    context             TEXT,
    inputs              TEXT NOT NULL,
    constraints         TEXT NOT NULL,
    audience            TEXT,
    format              TEXT,
    acceptance_criteria TEXT NOT NULL,
    privacy             TEXT,
    user_prefs          TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_task_specs_org_created ON task_specs(org_id, created_at);

CREATE TABLE IF NOT EXISTS templates (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    org_id       INTEGER NOT NULL DEFAULT 1,
    title        TEXT NOT NULL,
    description  TEXT,
    task_spec_id INTEGER,
    tags         TEXT NOT NULL,
    proven       INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_templates_org_created ON templates(org_id, created_at);

CREATE TABLE IF NOT EXISTS runs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      TEXT NOT NULL,
    org_id       INTEGER NOT NULL DEFAULT 1,
    task_spec_id INTEGER NOT NULL,
    model        TEXT NOT NULL,
    tokens       INTEGER NOT NULL,
    cost_usd     REAL NOT NULL,
    latency_ms   INTEGER NOT NULL,
    output       TEXT NOT NULL,
    verdict      TEXT,
    learn        TEXT,
    status       TEXT NOT NULL DEFAULT 'succeeded',
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_runs_org_created ON runs(org_id, created_at);
CREATE INDEX IF NOT EXISTS idx_runs_status ON runs(status);

CREATE TABLE IF NOT EXISTS lessons (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    bullets       TEXT NOT NULL,
    next_time_try TEXT NOT NULL,
    created_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_lessons_created ON lessons(created_at);
";

/// Persistent storage for all record resources, backed by SQLStore.
pub struct RecordStore {
    db: Arc<dyn SQLStore>,
}

impl RecordStore {
    /// Create a new RecordStore and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        db.exec_batch(SCHEMA)
            .map_err(|e| ServiceError::Storage(format!("records schema init: {e}")))?;
        Ok(Self { db })
    }

    pub(crate) fn db(&self) -> &dyn SQLStore {
        self.db.as_ref()
    }
}

// ── Shared row/SQL helpers ──────────────────────────────────────────

pub(crate) fn storage(e: SQLError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

/// A required column; a miss means the row is corrupt, never the client's
/// fault.
pub(crate) fn req_text(row: &Row, col: &str) -> Result<String, ServiceError> {
    row.get_str(col)
        .map(String::from)
        .ok_or_else(|| integrity(col))
}

pub(crate) fn opt_text(row: &Row, col: &str) -> Option<String> {
    row.get_str(col).map(String::from)
}

pub(crate) fn req_i64(row: &Row, col: &str) -> Result<i64, ServiceError> {
    row.get_i64(col).ok_or_else(|| integrity(col))
}

pub(crate) fn req_f64(row: &Row, col: &str) -> Result<f64, ServiceError> {
    row.get_f64(col).ok_or_else(|| integrity(col))
}

fn integrity(col: &str) -> ServiceError {
    ServiceError::Integrity(format!("stored column {col} missing or malformed"))
}

/// SQL parameter for an optional text column.
pub(crate) fn opt_value(text: Option<String>) -> Value {
    match text {
        Some(s) => Value::Text(s),
        None => Value::Null,
    }
}

/// Substring-match pattern for LIKE filters.
pub(crate) fn like_pattern(needle: &str) -> String {
    format!("%{needle}%")
}
