//! Artist entity and its DTOs.
//!
//! An artist owns artworks only by back-reference: the list is resolved by
//! querying artworks on `artist_id`, never stored on the artist.

use super::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

pub type ArtistId = i64;

/// Persisted artist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub artist_id: ArtistId,
    pub name: String,
    pub bio: Option<String>,
    pub email: String,
    /// Optimistic concurrency counter, bumped by every successful replace.
    pub row_version: i64,
}

impl Artist {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.email)
    }

    /// Returns the replacement value for `request`, keeping identity and the
    /// version this copy was read at.
    pub fn with_update(&self, request: &UpdateArtistDto) -> Self {
        Self {
            artist_id: self.artist_id,
            name: request.name.clone(),
            bio: request.bio.clone(),
            email: request.email.clone(),
            row_version: self.row_version,
        }
    }
}

/// Insert payload; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub bio: Option<String>,
    pub email: String,
}

impl NewArtist {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.email)
    }
}

fn validate_fields(name: &str, email: &str) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::BlankArtistName);
    }
    if is_blank(email) {
        return Err(ValidationError::BlankArtistEmail);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddArtistDto {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    pub email: String,
}

impl From<&AddArtistDto> for NewArtist {
    fn from(value: &AddArtistDto) -> Self {
        Self {
            name: value.name.clone(),
            bio: value.bio.clone(),
            email: value.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateArtistDto {
    pub artist_id: ArtistId,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    pub email: String,
}

/// Read projection with artwork aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistDto {
    pub artist_id: ArtistId,
    pub name: String,
    pub bio: Option<String>,
    pub total_artworks: usize,
    /// Titles in artwork id order.
    pub artworks_title: Vec<String>,
}

impl ArtistDto {
    pub fn project(artist: Artist, artworks_title: Vec<String>) -> Self {
        Self {
            artist_id: artist.artist_id,
            name: artist.name,
            bio: artist.bio,
            total_artworks: artworks_title.len(),
            artworks_title,
        }
    }
}
