/// Movie catalog abstraction
///
/// Wraps the two read operations the workflow needs from an external movie
/// catalog: search by title (with optional year) and details lookup by ID.
/// The one production implementation talks to OMDb; tests substitute mocks
/// or local stand-in servers behind the same trait.
use crate::{
    error::AppResult,
    models::{MovieDetails, MovieSummary},
};

pub mod omdb;

pub use omdb::OmdbCatalog;

/// Trait for movie catalog clients
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search for movies by title and optional release year.
    ///
    /// An empty title yields an empty list without touching the network. A
    /// non-numeric year is ignored rather than sent upstream.
    async fn search<'a>(&self, title: &str, year: Option<&'a str>) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the full record for one movie by its catalog ID
    async fn get_details(&self, id: &str) -> AppResult<MovieDetails>;
}
