//! Upstream content sources.
//!
//! [`ContentSource`] is the seam between the lookup service and the metadata
//! API. [`TmdbSource`] is the production implementation; tests substitute
//! in-memory fakes.

mod convert;
pub mod tmdb;

pub use convert::{detail_content, multi_search_contents, trending_contents, DetailRecord, UNTITLED};
pub use tmdb::TmdbSource;

use async_trait::async_trait;

use crate::errors::ProvidersError;
use crate::models::{Content, MediaType};
use crate::schema::{MovieRecord, WatchProviders};

/// Read-only access to movie and series metadata plus watch providers.
///
/// Implementations return validated, typed data. Listing operations apply
/// their own filtering and ordering; callers only truncate.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Whether the source has the credentials it needs to answer requests.
    fn is_configured(&self) -> bool {
        true
    }

    /// Movie title search, in upstream relevance order.
    async fn search_movies(
        &self,
        query: &str,
        language: &str,
        region: Option<&str>,
    ) -> Result<Vec<MovieRecord>, ProvidersError>;

    /// Movie and series search, most popular first. People and rows without
    /// a title are dropped.
    async fn search_multi(&self, query: &str, language: &str)
        -> Result<Vec<Content>, ProvidersError>;

    async fn movie(&self, id: u64, language: &str) -> Result<MovieRecord, ProvidersError>;

    async fn content_detail(
        &self,
        media_type: MediaType,
        id: u64,
        language: &str,
    ) -> Result<Content, ProvidersError>;

    /// Per-region watch providers for a title.
    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<WatchProviders, ProvidersError>;

    /// Today's trending titles, most popular first.
    async fn trending(
        &self,
        media_type: MediaType,
        language: &str,
    ) -> Result<Vec<Content>, ProvidersError>;
}
