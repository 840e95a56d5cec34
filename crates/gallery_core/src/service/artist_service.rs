//! Artist use-case service.
//!
//! # Invariants
//! - Aggregates (`total_artworks`, `artworks_title`) are computed on every
//!   read from the artworks that currently reference the artist.
//! - Deleting an artist deletes its artworks.

use super::response::ServiceResponse;
use super::{read_failure, titles_by};
use crate::model::artist::{AddArtistDto, ArtistDto, ArtistId, NewArtist, UpdateArtistDto};
use crate::repo::artist_repo::ArtistRepository;
use crate::repo::artwork_repo::{ArtworkListQuery, ArtworkRepository};
use crate::repo::RepoError;
use log::{info, warn};

pub struct ArtistService<A: ArtistRepository, W: ArtworkRepository> {
    artists: A,
    artworks: W,
}

impl<A: ArtistRepository, W: ArtworkRepository> ArtistService<A, W> {
    pub fn new(artists: A, artworks: W) -> Self {
        Self { artists, artworks }
    }

    /// Every artist in id order with its artwork count and titles.
    pub fn list_artists(&self) -> Result<Vec<ArtistDto>, ServiceResponse> {
        let artists = self
            .artists
            .list_artists()
            .map_err(|err| read_failure("artist_list", err))?;
        let artworks = self
            .artworks
            .list_artworks(&ArtworkListQuery::default())
            .map_err(|err| read_failure("artist_list", err))?;

        let mut titles = titles_by(artworks, |artwork| Some(artwork.artist_id));
        Ok(artists
            .into_iter()
            .map(|artist| {
                let artist_titles = titles.remove(&artist.artist_id).unwrap_or_default();
                ArtistDto::project(artist, artist_titles)
            })
            .collect())
    }

    pub fn find_artist(&self, id: ArtistId) -> Result<ArtistDto, ServiceResponse> {
        let artist = self
            .artists
            .get_artist(id)
            .map_err(|err| read_failure("artist_find", err))?
            .ok_or_else(|| ServiceResponse::not_found("Artist not found."))?;
        let titles = self
            .artworks
            .list_artworks(&ArtworkListQuery::by_artist(id))
            .map_err(|err| read_failure("artist_find", err))?
            .into_iter()
            .map(|artwork| artwork.title)
            .collect();

        Ok(ArtistDto::project(artist, titles))
    }

    pub fn add_artist(&self, request: &AddArtistDto) -> ServiceResponse {
        match self.artists.create_artist(&NewArtist::from(request)) {
            Ok(artist_id) => {
                info!("event=artist_add module=service status=ok artist_id={artist_id}");
                ServiceResponse::created(artist_id)
            }
            Err(err) => {
                warn!("event=artist_add module=service status=error error={err}");
                ServiceResponse::error("There was an error adding the artist.")
                    .with_message(err.to_string())
            }
        }
    }

    /// Replaces name, bio and email of artist `id`.
    ///
    /// `request.artist_id` must equal `id`; a mismatch is rejected before the
    /// store is touched.
    pub fn update_artist(&self, id: ArtistId, request: &UpdateArtistDto) -> ServiceResponse {
        if request.artist_id != id {
            return ServiceResponse::error("Artist ID mismatch.");
        }

        let current = match self.artists.get_artist(id) {
            Ok(Some(artist)) => artist,
            Ok(None) => return ServiceResponse::not_found("Artist not found."),
            Err(err) => return read_failure("artist_update", err),
        };

        match self.artists.replace_artist(&current.with_update(request)) {
            Ok(_) => {
                info!("event=artist_update module=service status=ok artist_id={id}");
                ServiceResponse::updated()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found("Artist not found."),
            Err(err) => {
                warn!("event=artist_update module=service status=error artist_id={id} error={err}");
                ServiceResponse::error("An error occurred updating the record.")
                    .with_message(err.to_string())
            }
        }
    }

    /// Deletes artist `id` together with all of its artworks.
    pub fn delete_artist(&self, id: ArtistId) -> ServiceResponse {
        match self.artists.delete_artist(id) {
            Ok(removed_artworks) => {
                info!(
                    "event=artist_delete module=service status=ok artist_id={id} removed_artworks={removed_artworks}"
                );
                ServiceResponse::deleted()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found(
                "Artist cannot be deleted because it does not exist.",
            ),
            Err(err) => {
                warn!("event=artist_delete module=service status=error artist_id={id} error={err}");
                ServiceResponse::error("Error encountered while deleting the artist.")
                    .with_message(err.to_string())
            }
        }
    }
}
