//! Artwork repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `artworks` with foreign keys enforced by SQLite.
//! - Back-reference lookups by artist or category, and eager loading of the
//!   related names used by read projections.
//!
//! # Invariants
//! - Lists are ordered by `artwork_id ASC` (insertion order).
//! - An artwork whose artist row, or whose non-null category row, cannot be
//!   resolved is reported as `InvalidData`, never skipped.

use super::{
    ensure_connection_ready, stale_write_error, EntityKind, RepoError, RepoResult,
    ARTISTS_SHAPE, ARTWORKS_SHAPE, CATEGORIES_SHAPE,
};
use crate::model::artist::ArtistId;
use crate::model::artwork::{Artwork, ArtworkId, NewArtwork};
use crate::model::category::CategoryId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ARTWORK_SELECT_SQL: &str = "SELECT
    artworks.artwork_id AS artwork_id,
    artworks.title AS title,
    artworks.description AS description,
    artworks.date_posted AS date_posted,
    artworks.artist_id AS artist_id,
    artworks.category_id AS category_id,
    artworks.row_version AS row_version
FROM artworks";

const ARTWORK_WITH_RELATED_SELECT_SQL: &str = "SELECT
    artworks.artwork_id AS artwork_id,
    artworks.title AS title,
    artworks.description AS description,
    artworks.date_posted AS date_posted,
    artworks.artist_id AS artist_id,
    artworks.category_id AS category_id,
    artworks.row_version AS row_version,
    artists.name AS artist_name,
    categories.name AS category_name
FROM artworks
LEFT JOIN artists ON artists.artist_id = artworks.artist_id
LEFT JOIN categories ON categories.category_id = artworks.category_id";

/// Foreign-key filters for artwork lists. Unset fields do not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtworkListQuery {
    pub artist_id: Option<ArtistId>,
    pub category_id: Option<CategoryId>,
}

impl ArtworkListQuery {
    pub fn by_artist(artist_id: ArtistId) -> Self {
        Self {
            artist_id: Some(artist_id),
            ..Self::default()
        }
    }

    pub fn by_category(category_id: CategoryId) -> Self {
        Self {
            category_id: Some(category_id),
            ..Self::default()
        }
    }
}

/// Artwork row with its artist and category names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkWithRelated {
    pub artwork: Artwork,
    pub artist_name: String,
    /// `None` when the artwork has been unlinked from its category.
    pub category_name: Option<String>,
}

pub trait ArtworkRepository {
    /// Inserts one artwork; unknown artist or category ids fail with
    /// `ConstraintViolation`.
    fn create_artwork(&self, artwork: &NewArtwork) -> RepoResult<ArtworkId>;
    fn get_artwork(&self, id: ArtworkId) -> RepoResult<Option<Artwork>>;
    fn list_artworks(&self, query: &ArtworkListQuery) -> RepoResult<Vec<Artwork>>;
    fn get_artwork_with_related(&self, id: ArtworkId) -> RepoResult<Option<ArtworkWithRelated>>;
    fn list_artworks_with_related(
        &self,
        query: &ArtworkListQuery,
    ) -> RepoResult<Vec<ArtworkWithRelated>>;
    /// Versioned write of every mutable field, links included.
    fn replace_artwork(&self, artwork: &Artwork) -> RepoResult<Artwork>;
    fn delete_artwork(&self, id: ArtworkId) -> RepoResult<()>;
}

pub struct SqliteArtworkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArtworkRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[ARTWORKS_SHAPE, ARTISTS_SHAPE, CATEGORIES_SHAPE])?;
        Ok(Self { conn })
    }
}

impl ArtworkRepository for SqliteArtworkRepository<'_> {
    fn create_artwork(&self, artwork: &NewArtwork) -> RepoResult<ArtworkId> {
        artwork.validate()?;

        self.conn.execute(
            "INSERT INTO artworks (
                title,
                description,
                date_posted,
                artist_id,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                artwork.title,
                artwork.description,
                artwork.date_posted,
                artwork.artist_id,
                artwork.category_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_artwork(&self, id: ArtworkId) -> RepoResult<Option<Artwork>> {
        let artwork = self
            .conn
            .query_row(
                &format!("{ARTWORK_SELECT_SQL} WHERE artworks.artwork_id = ?1;"),
                [id],
                parse_artwork_row,
            )
            .optional()?;
        Ok(artwork)
    }

    fn list_artworks(&self, query: &ArtworkListQuery) -> RepoResult<Vec<Artwork>> {
        let (sql, bind_values) = filtered_sql(ARTWORK_SELECT_SQL, query);
        let mut stmt = self.conn.prepare(&sql)?;
        let artworks = stmt
            .query_map(params_from_iter(bind_values), parse_artwork_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artworks)
    }

    fn get_artwork_with_related(&self, id: ArtworkId) -> RepoResult<Option<ArtworkWithRelated>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ARTWORK_WITH_RELATED_SELECT_SQL} WHERE artworks.artwork_id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_related_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_artworks_with_related(
        &self,
        query: &ArtworkListQuery,
    ) -> RepoResult<Vec<ArtworkWithRelated>> {
        let (sql, bind_values) = filtered_sql(ARTWORK_WITH_RELATED_SELECT_SQL, query);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut artworks = Vec::new();
        while let Some(row) = rows.next()? {
            artworks.push(parse_related_row(row)?);
        }
        Ok(artworks)
    }

    fn replace_artwork(&self, artwork: &Artwork) -> RepoResult<Artwork> {
        artwork.validate()?;

        let changed = self.conn.execute(
            "UPDATE artworks
             SET
                title = ?1,
                description = ?2,
                date_posted = ?3,
                artist_id = ?4,
                category_id = ?5,
                row_version = row_version + 1
             WHERE artwork_id = ?6
               AND row_version = ?7;",
            params![
                artwork.title,
                artwork.description,
                artwork.date_posted,
                artwork.artist_id,
                artwork.category_id,
                artwork.artwork_id,
                artwork.row_version,
            ],
        )?;

        if changed == 0 {
            return Err(stale_write_error(
                self.conn,
                EntityKind::Artwork,
                artwork.artwork_id,
                artwork.row_version,
            ));
        }

        Ok(Artwork {
            row_version: artwork.row_version + 1,
            ..artwork.clone()
        })
    }

    fn delete_artwork(&self, id: ArtworkId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM artworks WHERE artwork_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Artwork,
                id,
            });
        }
        Ok(())
    }
}

fn filtered_sql(select_sql: &str, query: &ArtworkListQuery) -> (String, Vec<Value>) {
    let mut sql = format!("{select_sql} WHERE 1 = 1");
    let mut bind_values = Vec::new();

    if let Some(artist_id) = query.artist_id {
        sql.push_str(" AND artworks.artist_id = ?");
        bind_values.push(Value::Integer(artist_id));
    }
    if let Some(category_id) = query.category_id {
        sql.push_str(" AND artworks.category_id = ?");
        bind_values.push(Value::Integer(category_id));
    }
    sql.push_str(" ORDER BY artworks.artwork_id ASC;");

    (sql, bind_values)
}

fn parse_artwork_row(row: &Row<'_>) -> rusqlite::Result<Artwork> {
    Ok(Artwork {
        artwork_id: row.get("artwork_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date_posted: row.get("date_posted")?,
        artist_id: row.get("artist_id")?,
        category_id: row.get("category_id")?,
        row_version: row.get("row_version")?,
    })
}

fn parse_related_row(row: &Row<'_>) -> RepoResult<ArtworkWithRelated> {
    let artwork = parse_artwork_row(row)?;

    let artist_name = row.get::<_, Option<String>>("artist_name")?.ok_or_else(|| {
        RepoError::InvalidData(format!(
            "artwork {} references missing artist {}",
            artwork.artwork_id, artwork.artist_id
        ))
    })?;

    let category_name: Option<String> = row.get("category_name")?;
    if let (Some(category_id), None) = (artwork.category_id, category_name.as_ref()) {
        return Err(RepoError::InvalidData(format!(
            "artwork {} references missing category {category_id}",
            artwork.artwork_id
        )));
    }

    Ok(ArtworkWithRelated {
        artwork,
        artist_name,
        category_name,
    })
}
