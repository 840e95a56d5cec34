//! Gallery domain model.
//!
//! # Responsibility
//! - Define persisted entities, insert payloads, request DTOs and read
//!   projections for artists, categories and artworks.
//! - Own field-level validation used by every repository write.
//!
//! # Invariants
//! - Entity ids are assigned by storage and never change.
//! - Updates produce a new entity value from an immutable request; nothing
//!   mutates a shared record in place.

pub mod artist;
pub mod artwork;
pub mod category;

use thiserror::Error;

/// Required-field violations detected before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("artist name must not be blank")]
    BlankArtistName,
    #[error("artist email must not be blank")]
    BlankArtistEmail,
    #[error("artwork title must not be blank")]
    BlankArtworkTitle,
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
