//! Gallery use-case services.
//!
//! # Responsibility
//! - Coordinate repository calls into the artist/category/artwork
//!   operations external callers use.
//! - Translate every store error into a `ServiceResponse`; no `RepoError`
//!   crosses this boundary.
//!
//! # Invariants
//! - No caching: every call re-reads the store.
//! - No retries: conflicts are reported, the caller decides.

pub mod artist_service;
pub mod artwork_service;
pub mod category_service;
pub mod response;

use crate::model::artwork::Artwork;
use crate::repo::RepoError;
use log::error;
use response::ServiceResponse;
use std::collections::HashMap;

/// Response for a failed read; the store error survives only as a message.
pub(crate) fn read_failure(event: &str, err: RepoError) -> ServiceResponse {
    error!("event={event} module=service status=error error={err}");
    ServiceResponse::error("An error occurred while reading the gallery store.")
        .with_message(err.to_string())
}

/// Groups artwork titles under the key chosen by `key`, keeping the input
/// order inside each group. Artworks whose key is `None` are skipped.
pub(crate) fn titles_by<F>(artworks: Vec<Artwork>, key: F) -> HashMap<i64, Vec<String>>
where
    F: Fn(&Artwork) -> Option<i64>,
{
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for artwork in artworks {
        if let Some(id) = key(&artwork) {
            grouped.entry(id).or_default().push(artwork.title);
        }
    }
    grouped
}
