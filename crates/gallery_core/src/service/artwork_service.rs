//! Artwork use-case service.
//!
//! # Responsibility
//! - Artwork CRUD with artist/category existence checks ahead of writes.
//! - Linking an artwork to a category and clearing that link.
//!
//! # Invariants
//! - Link is a no-write `AlreadyExists` when the artwork is already filed
//!   under the target category.
//! - Unlink leaves the artwork without a category; it is not deleted.

use super::read_failure;
use super::response::ServiceResponse;
use crate::model::artist::ArtistId;
use crate::model::artwork::{AddArtworkDto, ArtworkDto, ArtworkId, NewArtwork, UpdateArtworkDto};
use crate::model::category::CategoryId;
use crate::repo::artist_repo::ArtistRepository;
use crate::repo::artwork_repo::{ArtworkListQuery, ArtworkRepository, ArtworkWithRelated};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use log::{info, warn};

pub struct ArtworkService<W: ArtworkRepository, A: ArtistRepository, C: CategoryRepository> {
    artworks: W,
    artists: A,
    categories: C,
}

impl<W, A, C> ArtworkService<W, A, C>
where
    W: ArtworkRepository,
    A: ArtistRepository,
    C: CategoryRepository,
{
    pub fn new(artworks: W, artists: A, categories: C) -> Self {
        Self {
            artworks,
            artists,
            categories,
        }
    }

    /// Every artwork in id order with artist and category names resolved.
    pub fn list_artworks(&self) -> Result<Vec<ArtworkDto>, ServiceResponse> {
        let artworks = self
            .artworks
            .list_artworks_with_related(&ArtworkListQuery::default())
            .map_err(|err| read_failure("artwork_list", err))?;
        Ok(artworks.into_iter().map(to_dto).collect())
    }

    pub fn find_artwork(&self, id: ArtworkId) -> Result<ArtworkDto, ServiceResponse> {
        self.artworks
            .get_artwork_with_related(id)
            .map_err(|err| read_failure("artwork_find", err))?
            .map(to_dto)
            .ok_or_else(|| ServiceResponse::not_found("Artwork not found."))
    }

    /// Titles of the artworks filed under `category_id`, in id order.
    pub fn list_artwork_titles_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<String>, ServiceResponse> {
        let exists = self
            .categories
            .get_category(category_id)
            .map_err(|err| read_failure("artwork_titles_by_category", err))?
            .is_some();
        if !exists {
            return Err(ServiceResponse::not_found("Category not found."));
        }

        let titles = self
            .artworks
            .list_artworks(&ArtworkListQuery::by_category(category_id))
            .map_err(|err| read_failure("artwork_titles_by_category", err))?
            .into_iter()
            .map(|artwork| artwork.title)
            .collect();
        Ok(titles)
    }

    pub fn add_artwork(&self, request: &AddArtworkDto) -> ServiceResponse {
        const FAILURE: &str = "There was an error adding the artwork.";

        if let Err(response) =
            self.check_references("artwork_add", FAILURE, request.artist_id, request.category_id)
        {
            return response;
        }

        match self.artworks.create_artwork(&NewArtwork::from(request)) {
            Ok(artwork_id) => {
                info!(
                    "event=artwork_add module=service status=ok artwork_id={artwork_id} artist_id={} category_id={}",
                    request.artist_id, request.category_id
                );
                ServiceResponse::created(artwork_id)
            }
            Err(err) => {
                warn!("event=artwork_add module=service status=error error={err}");
                ServiceResponse::error(FAILURE).with_message(err.to_string())
            }
        }
    }

    /// Replaces every mutable field of artwork `id`, both links included.
    pub fn update_artwork(&self, id: ArtworkId, request: &UpdateArtworkDto) -> ServiceResponse {
        const FAILURE: &str = "An error occurred updating the record.";

        if request.artwork_id != id {
            return ServiceResponse::error("Artwork ID mismatch.");
        }

        let current = match self.artworks.get_artwork(id) {
            Ok(Some(artwork)) => artwork,
            Ok(None) => return ServiceResponse::not_found("Artwork not found."),
            Err(err) => return read_failure("artwork_update", err),
        };

        if let Err(response) =
            self.check_references("artwork_update", FAILURE, request.artist_id, request.category_id)
        {
            return response;
        }

        match self.artworks.replace_artwork(&current.with_update(request)) {
            Ok(_) => {
                info!("event=artwork_update module=service status=ok artwork_id={id}");
                ServiceResponse::updated()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found("Artwork not found."),
            Err(err) => {
                warn!("event=artwork_update module=service status=error artwork_id={id} error={err}");
                ServiceResponse::error(FAILURE).with_message(err.to_string())
            }
        }
    }

    pub fn delete_artwork(&self, id: ArtworkId) -> ServiceResponse {
        match self.artworks.delete_artwork(id) {
            Ok(()) => {
                info!("event=artwork_delete module=service status=ok artwork_id={id}");
                ServiceResponse::deleted()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found(
                "Artwork cannot be deleted because it does not exist.",
            ),
            Err(err) => {
                warn!("event=artwork_delete module=service status=error artwork_id={id} error={err}");
                ServiceResponse::error("Error encountered while deleting the artwork.")
                    .with_message(err.to_string())
            }
        }
    }

    /// Files artwork `artwork_id` under category `category_id`.
    ///
    /// The artwork is resolved first, then the category. Re-linking to the
    /// current category writes nothing and reports `AlreadyExists`.
    pub fn link_artwork_to_category(
        &self,
        artwork_id: ArtworkId,
        category_id: CategoryId,
    ) -> ServiceResponse {
        let artwork = match self.artworks.get_artwork(artwork_id) {
            Ok(Some(artwork)) => artwork,
            Ok(None) => return ServiceResponse::not_found("Artwork not found."),
            Err(err) => return read_failure("artwork_link", err),
        };
        match self.categories.get_category(category_id) {
            Ok(Some(_)) => {}
            Ok(None) => return ServiceResponse::not_found("Category not found."),
            Err(err) => return read_failure("artwork_link", err),
        }

        if artwork.category_id == Some(category_id) {
            info!(
                "event=artwork_link module=service status=already_linked artwork_id={artwork_id} category_id={category_id}"
            );
            return ServiceResponse::already_exists("Artwork is already linked to this category.");
        }

        match self
            .artworks
            .replace_artwork(&artwork.with_category(Some(category_id)))
        {
            Ok(_) => {
                info!(
                    "event=artwork_link module=service status=ok artwork_id={artwork_id} category_id={category_id}"
                );
                ServiceResponse::updated().with_message(format!(
                    "Artwork with ID {artwork_id} successfully linked to Category with ID {category_id}."
                ))
            }
            Err(err) => {
                warn!(
                    "event=artwork_link module=service status=error artwork_id={artwork_id} category_id={category_id} error={err}"
                );
                ServiceResponse::error("An error occurred linking the artwork to the category.")
                    .with_message(err.to_string())
            }
        }
    }

    /// Clears the category link of artwork `artwork_id` when it is filed
    /// under `category_id`. The artwork is left without a category.
    pub fn unlink_artwork_from_category(
        &self,
        artwork_id: ArtworkId,
        category_id: CategoryId,
    ) -> ServiceResponse {
        match self.categories.get_category(category_id) {
            Ok(Some(_)) => {}
            Ok(None) => return ServiceResponse::not_found("Category not found."),
            Err(err) => return read_failure("artwork_unlink", err),
        }

        let artwork = match self.artworks.get_artwork(artwork_id) {
            Ok(Some(artwork)) if artwork.category_id == Some(category_id) => artwork,
            Ok(_) => {
                return ServiceResponse::not_linked("Artwork is not linked to this category.")
            }
            Err(err) => return read_failure("artwork_unlink", err),
        };

        match self.artworks.replace_artwork(&artwork.with_category(None)) {
            Ok(_) => {
                warn!(
                    "event=artwork_unlink module=service status=ok artwork_id={artwork_id} category_id={category_id} category=unassigned"
                );
                ServiceResponse::updated().with_message(format!(
                    "Artwork {artwork_id} successfully unlinked from Category {category_id}."
                ))
            }
            Err(err) => {
                warn!(
                    "event=artwork_unlink module=service status=error artwork_id={artwork_id} category_id={category_id} error={err}"
                );
                ServiceResponse::error("An error occurred unlinking the artwork from the category.")
                    .with_message(err.to_string())
            }
        }
    }

    /// `Err` names every missing reference under the `failure` headline.
    fn check_references(
        &self,
        event: &str,
        failure: &str,
        artist_id: ArtistId,
        category_id: CategoryId,
    ) -> Result<(), ServiceResponse> {
        let artist_exists = self
            .artists
            .get_artist(artist_id)
            .map_err(|err| read_failure(event, err))?
            .is_some();
        let category_exists = self
            .categories
            .get_category(category_id)
            .map_err(|err| read_failure(event, err))?
            .is_some();

        if artist_exists && category_exists {
            return Ok(());
        }

        let mut response = ServiceResponse::error(failure);
        if !artist_exists {
            response = response.with_message(format!("Artist with ID {artist_id} does not exist."));
        }
        if !category_exists {
            response =
                response.with_message(format!("Category with ID {category_id} does not exist."));
        }
        warn!(
            "event={event} module=service status=error reason=missing_reference artist_id={artist_id} category_id={category_id}"
        );
        Err(response)
    }
}

fn to_dto(related: ArtworkWithRelated) -> ArtworkDto {
    let ArtworkWithRelated {
        artwork,
        artist_name,
        category_name,
    } = related;
    ArtworkDto {
        artwork_id: artwork.artwork_id,
        title: artwork.title,
        description: artwork.description,
        date_posted: artwork.date_posted,
        artist_id: artwork.artist_id,
        category_id: artwork.category_id,
        artist_name,
        category_name,
    }
}
