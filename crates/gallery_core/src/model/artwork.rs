//! Artwork entity and its DTOs.
//!
//! # Invariants
//! - `artist_id` always references an existing artist.
//! - `category_id` references an existing category; it is `None` only after
//!   an explicit unlink, never through add or update.

use super::artist::ArtistId;
use super::category::CategoryId;
use super::{is_blank, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ArtworkId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub artwork_id: ArtworkId,
    pub title: String,
    pub description: String,
    pub date_posted: NaiveDate,
    pub artist_id: ArtistId,
    pub category_id: Option<CategoryId>,
    pub row_version: i64,
}

impl Artwork {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Replacement value carrying every mutable field of `request`.
    pub fn with_update(&self, request: &UpdateArtworkDto) -> Self {
        Self {
            artwork_id: self.artwork_id,
            title: request.title.clone(),
            description: request.description.clone(),
            date_posted: request.date_posted,
            artist_id: request.artist_id,
            category_id: Some(request.category_id),
            row_version: self.row_version,
        }
    }

    /// Replacement value re-pointed at `category_id` (`None` unlinks).
    pub fn with_category(&self, category_id: Option<CategoryId>) -> Self {
        Self {
            category_id,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtwork {
    pub title: String,
    pub description: String,
    pub date_posted: NaiveDate,
    pub artist_id: ArtistId,
    pub category_id: CategoryId,
}

impl NewArtwork {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if is_blank(title) {
        return Err(ValidationError::BlankArtworkTitle);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddArtworkDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_posted: NaiveDate,
    pub artist_id: ArtistId,
    pub category_id: CategoryId,
}

impl From<&AddArtworkDto> for NewArtwork {
    fn from(value: &AddArtworkDto) -> Self {
        Self {
            title: value.title.clone(),
            description: value.description.clone(),
            date_posted: value.date_posted,
            artist_id: value.artist_id,
            category_id: value.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateArtworkDto {
    pub artwork_id: ArtworkId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_posted: NaiveDate,
    pub artist_id: ArtistId,
    pub category_id: CategoryId,
}

/// Read projection with denormalized artist and category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkDto {
    pub artwork_id: ArtworkId,
    pub title: String,
    pub description: String,
    pub date_posted: NaiveDate,
    pub artist_id: ArtistId,
    pub category_id: Option<CategoryId>,
    pub artist_name: String,
    /// `None` only for an artwork that was unlinked from its category.
    pub category_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Artwork, UpdateArtworkDto};
    use crate::model::ValidationError;
    use chrono::NaiveDate;

    fn stored() -> Artwork {
        Artwork {
            artwork_id: 9,
            title: "Sunset Glow".to_string(),
            description: String::new(),
            date_posted: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            artist_id: 1,
            category_id: Some(2),
            row_version: 1,
        }
    }

    #[test]
    fn with_update_replaces_links_and_fields() {
        let request = UpdateArtworkDto {
            artwork_id: 9,
            title: "Ocean Breeze".to_string(),
            description: "Oil on canvas".to_string(),
            date_posted: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            artist_id: 4,
            category_id: 5,
        };
        let updated = stored().with_update(&request);

        assert_eq!(updated.artwork_id, 9);
        assert_eq!(updated.artist_id, 4);
        assert_eq!(updated.category_id, Some(5));
        assert_eq!(updated.row_version, 1);
    }

    #[test]
    fn with_category_only_moves_the_link() {
        let moved = stored().with_category(None);
        assert_eq!(moved.category_id, None);
        assert_eq!(moved.title, "Sunset Glow");
    }

    #[test]
    fn blank_title_fails_validation() {
        let mut artwork = stored();
        artwork.title = "\t".to_string();
        assert_eq!(artwork.validate(), Err(ValidationError::BlankArtworkTitle));
    }
}
