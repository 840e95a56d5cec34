//! Core domain logic for the art gallery catalogue.
//! Artists, categories and artworks live in one SQLite store; read views
//! (artwork counts, title lists, resolved names) are derived on every read.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, GalleryConfig};
pub use db::{open_db, open_db_in_memory, open_with_config, DbError, DbResult};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::artist::{AddArtistDto, Artist, ArtistDto, ArtistId, UpdateArtistDto};
pub use model::artwork::{AddArtworkDto, Artwork, ArtworkDto, ArtworkId, UpdateArtworkDto};
pub use model::category::{AddCategoryDto, Category, CategoryDto, CategoryId, UpdateCategoryDto};
pub use model::ValidationError;
pub use repo::artist_repo::{ArtistRepository, SqliteArtistRepository};
pub use repo::artwork_repo::{
    ArtworkListQuery, ArtworkRepository, ArtworkWithRelated, SqliteArtworkRepository,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::artist_service::ArtistService;
pub use service::artwork_service::ArtworkService;
pub use service::category_service::CategoryService;
pub use service::response::{ServiceResponse, ServiceStatus};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
