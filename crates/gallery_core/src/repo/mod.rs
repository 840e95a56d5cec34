//! Entity store: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keyed get/list/insert/replace/delete for artists, categories and
//!   artworks.
//! - Referential integrity, optimistic versioning and cascade delete.
//!
//! # Invariants
//! - Every write validates its entity before any SQL runs.
//! - `replace_*` only succeeds against the `row_version` it was read at.
//! - Deleting an artist or category removes its artworks in the same
//!   transaction.
//! - No business rules beyond the above live here.

pub mod artist_repo;
pub mod artwork_repo;
pub mod category_repo;

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity types held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Category,
    Artwork,
}

impl EntityKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Artist => "artists",
            Self::Category => "categories",
            Self::Artwork => "artworks",
        }
    }

    /// Primary key column; artworks reference parents by the same name.
    pub(crate) fn id_column(self) -> &'static str {
        match self {
            Self::Artist => "artist_id",
            Self::Category => "category_id",
            Self::Artwork => "artwork_id",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Artist => "artist",
            Self::Category => "category",
            Self::Artwork => "artwork",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },
    /// Foreign key, `NOT NULL` or `CHECK` rule rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// Row changed since it was read.
    #[error("{entity} {id} was modified concurrently (expected row_version {expected_version})")]
    Conflict {
        entity: EntityKind,
        id: i64,
        expected_version: i64,
    },
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("repository requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            return Self::ConstraintViolation(value.to_string());
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Required table and the columns the repositories read or write.
pub(crate) type TableShape = (&'static str, &'static [&'static str]);

pub(crate) const ARTISTS_SHAPE: TableShape = (
    "artists",
    &["artist_id", "name", "bio", "email", "row_version"],
);
pub(crate) const CATEGORIES_SHAPE: TableShape = (
    "categories",
    &["category_id", "name", "date_created", "row_version"],
);
pub(crate) const ARTWORKS_SHAPE: TableShape = (
    "artworks",
    &[
        "artwork_id",
        "title",
        "description",
        "date_posted",
        "artist_id",
        "category_id",
        "row_version",
    ],
);

/// Rejects connections that were not opened through `db::open_*`.
pub(crate) fn ensure_connection_ready(conn: &Connection, shapes: &[TableShape]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in shapes {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

pub(crate) fn row_exists(conn: &Connection, entity: EntityKind, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1);",
            entity.table(),
            entity.id_column()
        ),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Explains why a versioned `UPDATE` touched no rows.
pub(crate) fn stale_write_error(
    conn: &Connection,
    entity: EntityKind,
    id: i64,
    expected_version: i64,
) -> RepoError {
    let current: Result<Option<i64>, rusqlite::Error> = conn
        .query_row(
            &format!(
                "SELECT row_version FROM {} WHERE {} = ?1;",
                entity.table(),
                entity.id_column()
            ),
            [id],
            |row| row.get(0),
        )
        .optional();

    match current {
        Ok(None) => RepoError::NotFound { entity, id },
        Ok(Some(_)) => RepoError::Conflict {
            entity,
            id,
            expected_version,
        },
        Err(err) => err.into(),
    }
}

/// Deletes every artwork pointing at `parent`, then the parent row, as one
/// atomic step. Returns the number of artworks removed.
///
/// Runs in its own `IMMEDIATE` transaction, or inside a savepoint when the
/// caller already holds a transaction on `conn`.
pub(crate) fn delete_cascading(conn: &Connection, parent: EntityKind, id: i64) -> RepoResult<usize> {
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let removed_artworks = delete_parent_and_artworks(&tx, parent, id)?;
        tx.commit()?;
        return Ok(removed_artworks);
    }

    conn.execute_batch("SAVEPOINT delete_cascading;")?;
    match delete_parent_and_artworks(conn, parent, id) {
        Ok(removed_artworks) => {
            conn.execute_batch("RELEASE delete_cascading;")?;
            Ok(removed_artworks)
        }
        Err(err) => {
            conn.execute_batch("ROLLBACK TO delete_cascading; RELEASE delete_cascading;")?;
            Err(err)
        }
    }
}

fn delete_parent_and_artworks(conn: &Connection, parent: EntityKind, id: i64) -> RepoResult<usize> {
    if !row_exists(conn, parent, id)? {
        return Err(RepoError::NotFound { entity: parent, id });
    }

    let removed_artworks = conn.execute(
        &format!("DELETE FROM artworks WHERE {} = ?1;", parent.id_column()),
        [id],
    )?;
    conn.execute(
        &format!(
            "DELETE FROM {} WHERE {} = ?1;",
            parent.table(),
            parent.id_column()
        ),
        [id],
    )?;
    Ok(removed_artworks)
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
