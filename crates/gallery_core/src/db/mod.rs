//! SQLite storage bootstrap for the gallery store.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections with the pragmas the store
//!   relies on (`foreign_keys`, busy timeout).
//! - Bring the schema to the latest embedded migration before any
//!   repository touches the connection.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A database written by a newer binary is never opened.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_with_config};

use crate::config::ConfigError;
use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while opening or migrating a database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid storage configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error(
        "database schema version {db_version} is newer than supported {latest_supported}"
    )]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}
