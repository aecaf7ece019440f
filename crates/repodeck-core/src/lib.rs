// Core of RepoDeck: models, the favorites store, the gateway seam and the
// per-screen view state
pub mod config;
pub mod error;
pub mod favorites;
pub mod format;
pub mod gateway;
pub mod models;
pub mod providers;
pub mod readme;
pub mod views;

pub use config::Config;
pub use error::Error;
pub use favorites::{Favorites, FavoritesCollection, FavoritesObserver, FavoritesStore};
pub use gateway::RepositoryGateway;
pub use models::{Contributor, Owner, RepoId, RepositoryRecord};
pub use providers::GitHubGateway;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
