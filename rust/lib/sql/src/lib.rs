//! Embedded SQL storage for promptdeck.
//!
//! A small dynamically-typed execution interface ([`SQLStore`]) with a
//! SQLite implementation. Single-statement `exec`/`insert` calls are the
//! atomicity unit the record service relies on.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
