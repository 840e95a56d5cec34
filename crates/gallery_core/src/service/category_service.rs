//! Category use-case service.

use super::response::ServiceResponse;
use super::{read_failure, titles_by};
use crate::model::category::{
    AddCategoryDto, CategoryDto, CategoryId, NewCategory, UpdateCategoryDto,
};
use crate::repo::artwork_repo::{ArtworkListQuery, ArtworkRepository};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use log::{info, warn};

pub struct CategoryService<C: CategoryRepository, W: ArtworkRepository> {
    categories: C,
    artworks: W,
}

impl<C: CategoryRepository, W: ArtworkRepository> CategoryService<C, W> {
    pub fn new(categories: C, artworks: W) -> Self {
        Self {
            categories,
            artworks,
        }
    }

    /// Every category in id order; unlinked artworks count toward none.
    pub fn list_categories(&self) -> Result<Vec<CategoryDto>, ServiceResponse> {
        let categories = self
            .categories
            .list_categories()
            .map_err(|err| read_failure("category_list", err))?;
        let artworks = self
            .artworks
            .list_artworks(&ArtworkListQuery::default())
            .map_err(|err| read_failure("category_list", err))?;

        let mut titles = titles_by(artworks, |artwork| artwork.category_id);
        Ok(categories
            .into_iter()
            .map(|category| {
                let category_titles = titles.remove(&category.category_id).unwrap_or_default();
                CategoryDto::project(category, category_titles)
            })
            .collect())
    }

    pub fn find_category(&self, id: CategoryId) -> Result<CategoryDto, ServiceResponse> {
        let category = self
            .categories
            .get_category(id)
            .map_err(|err| read_failure("category_find", err))?
            .ok_or_else(|| ServiceResponse::not_found("Category not found."))?;
        let titles = self
            .artworks
            .list_artworks(&ArtworkListQuery::by_category(id))
            .map_err(|err| read_failure("category_find", err))?
            .into_iter()
            .map(|artwork| artwork.title)
            .collect();

        Ok(CategoryDto::project(category, titles))
    }

    pub fn add_category(&self, request: &AddCategoryDto) -> ServiceResponse {
        match self.categories.create_category(&NewCategory::from(request)) {
            Ok(category_id) => {
                info!("event=category_add module=service status=ok category_id={category_id}");
                ServiceResponse::created(category_id)
            }
            Err(err) => {
                warn!("event=category_add module=service status=error error={err}");
                ServiceResponse::error("There was an error adding the category.")
                    .with_message(err.to_string())
            }
        }
    }

    pub fn update_category(&self, id: CategoryId, request: &UpdateCategoryDto) -> ServiceResponse {
        if request.category_id != id {
            return ServiceResponse::error("Category ID mismatch.");
        }

        let current = match self.categories.get_category(id) {
            Ok(Some(category)) => category,
            Ok(None) => return ServiceResponse::not_found("Category not found."),
            Err(err) => return read_failure("category_update", err),
        };

        match self.categories.replace_category(&current.with_update(request)) {
            Ok(_) => {
                info!("event=category_update module=service status=ok category_id={id}");
                ServiceResponse::updated()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found("Category not found."),
            Err(err) => {
                warn!(
                    "event=category_update module=service status=error category_id={id} error={err}"
                );
                ServiceResponse::error("An error occurred updating the record.")
                    .with_message(err.to_string())
            }
        }
    }

    /// Deletes category `id` and every artwork filed under it.
    pub fn delete_category(&self, id: CategoryId) -> ServiceResponse {
        match self.categories.delete_category(id) {
            Ok(removed_artworks) => {
                info!(
                    "event=category_delete module=service status=ok category_id={id} removed_artworks={removed_artworks}"
                );
                ServiceResponse::deleted()
            }
            Err(RepoError::NotFound { .. }) => ServiceResponse::not_found(
                "Category cannot be deleted because it does not exist.",
            ),
            Err(err) => {
                warn!(
                    "event=category_delete module=service status=error category_id={id} error={err}"
                );
                ServiceResponse::error("Error encountered while deleting the category.")
                    .with_message(err.to_string())
            }
        }
    }
}
