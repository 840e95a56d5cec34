//! Artist repository contract and SQLite implementation.

use super::{
    delete_cascading, ensure_connection_ready, stale_write_error, EntityKind, RepoResult,
    ARTISTS_SHAPE, ARTWORKS_SHAPE,
};
use crate::model::artist::{Artist, ArtistId, NewArtist};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ARTIST_SELECT_SQL: &str = "SELECT
    artist_id,
    name,
    bio,
    email,
    row_version
FROM artists";

pub trait ArtistRepository {
    fn create_artist(&self, artist: &NewArtist) -> RepoResult<ArtistId>;
    fn get_artist(&self, id: ArtistId) -> RepoResult<Option<Artist>>;
    /// All artists ordered by id.
    fn list_artists(&self) -> RepoResult<Vec<Artist>>;
    /// Writes all mutable fields if the stored `row_version` still matches,
    /// returning the persisted value.
    fn replace_artist(&self, artist: &Artist) -> RepoResult<Artist>;
    /// Deletes the artist and its artworks; returns how many artworks went
    /// with it.
    fn delete_artist(&self, id: ArtistId) -> RepoResult<usize>;
}

pub struct SqliteArtistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArtistRepository<'conn> {
    /// Wraps a connection opened through `db::open_*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[ARTISTS_SHAPE, ARTWORKS_SHAPE])?;
        Ok(Self { conn })
    }
}

impl ArtistRepository for SqliteArtistRepository<'_> {
    fn create_artist(&self, artist: &NewArtist) -> RepoResult<ArtistId> {
        artist.validate()?;

        self.conn.execute(
            "INSERT INTO artists (name, bio, email) VALUES (?1, ?2, ?3);",
            params![artist.name, artist.bio, artist.email],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_artist(&self, id: ArtistId) -> RepoResult<Option<Artist>> {
        let artist = self
            .conn
            .query_row(
                &format!("{ARTIST_SELECT_SQL} WHERE artist_id = ?1;"),
                [id],
                parse_artist_row,
            )
            .optional()?;
        Ok(artist)
    }

    fn list_artists(&self) -> RepoResult<Vec<Artist>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTIST_SELECT_SQL} ORDER BY artist_id ASC;"))?;
        let artists = stmt
            .query_map([], parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    fn replace_artist(&self, artist: &Artist) -> RepoResult<Artist> {
        artist.validate()?;

        let changed = self.conn.execute(
            "UPDATE artists
             SET
                name = ?1,
                bio = ?2,
                email = ?3,
                row_version = row_version + 1
             WHERE artist_id = ?4
               AND row_version = ?5;",
            params![
                artist.name,
                artist.bio,
                artist.email,
                artist.artist_id,
                artist.row_version,
            ],
        )?;

        if changed == 0 {
            return Err(stale_write_error(
                self.conn,
                EntityKind::Artist,
                artist.artist_id,
                artist.row_version,
            ));
        }

        Ok(Artist {
            row_version: artist.row_version + 1,
            ..artist.clone()
        })
    }

    fn delete_artist(&self, id: ArtistId) -> RepoResult<usize> {
        delete_cascading(self.conn, EntityKind::Artist, id)
    }
}

fn parse_artist_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        artist_id: row.get("artist_id")?,
        name: row.get("name")?,
        bio: row.get("bio")?,
        email: row.get("email")?,
        row_version: row.get("row_version")?,
    })
}
