//! TMDB content source.
//!
//! Talks to the TMDB v3 REST API:
//! - `/search/movie` and `/search/multi` for title search
//! - `/movie/{id}` and `/tv/{id}` for details
//! - `/{type}/{id}/watch/providers` for per-region availability
//! - `/trending/{type}/day` for the landing page
//!
//! The API key travels as the `api_key` query parameter and is never logged.
//! API documentation: https://developer.themoviedb.org/reference

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::errors::ProvidersError;
use crate::models::{Content, MediaType};
use crate::schema::{
    validate, MovieRecord, MovieSearchPage, MultiSearchPage, TrendingPage, TvRecord,
    UpstreamSchema, WatchProviders,
};
use crate::source::convert::{detail_content, multi_search_contents, trending_contents, DetailRecord};
use crate::source::ContentSource;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// TMDB-backed [`ContentSource`].
pub struct TmdbSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbSource {
    /// Create a source. A blank or absent key leaves the source unconfigured;
    /// every request then fails with [`ProvidersError::MissingApiKey`].
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Point the source at a different API root (without trailing slash).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `path` and validate the body against `T`.
    async fn fetch<T: UpstreamSchema>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProvidersError> {
        let api_key = self.api_key.as_deref().ok_or(ProvidersError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);

        debug!("TMDB request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("TMDB rate limited request to {}", path);
            return Err(ProvidersError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let message = if body.is_empty() {
                reason.to_string()
            } else {
                format!("{}: {}", reason, body)
            };
            return Err(ProvidersError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        validate(&body)
    }
}

#[async_trait]
impl ContentSource for TmdbSource {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search_movies(
        &self,
        query: &str,
        language: &str,
        region: Option<&str>,
    ) -> Result<Vec<MovieRecord>, ProvidersError> {
        let mut params = vec![
            ("query", query),
            ("language", language),
            ("include_adult", "false"),
            ("page", "1"),
        ];
        if let Some(region) = region {
            params.push(("region", region));
        }

        let page: MovieSearchPage = self.fetch("/search/movie", &params).await?;
        Ok(page.results)
    }

    async fn search_multi(
        &self,
        query: &str,
        language: &str,
    ) -> Result<Vec<Content>, ProvidersError> {
        let params = [
            ("query", query),
            ("language", language),
            ("include_adult", "false"),
            ("page", "1"),
        ];

        let page: MultiSearchPage = self.fetch("/search/multi", &params).await?;
        Ok(multi_search_contents(page.results))
    }

    async fn movie(&self, id: u64, language: &str) -> Result<MovieRecord, ProvidersError> {
        self.fetch(&format!("/movie/{}", id), &[("language", language)])
            .await
    }

    async fn content_detail(
        &self,
        media_type: MediaType,
        id: u64,
        language: &str,
    ) -> Result<Content, ProvidersError> {
        let path = format!("/{}/{}", media_type, id);
        let params = [("language", language)];

        let record = match media_type {
            MediaType::Movie => DetailRecord::Movie(self.fetch::<MovieRecord>(&path, &params).await?),
            MediaType::Tv => DetailRecord::Tv(self.fetch::<TvRecord>(&path, &params).await?),
        };
        Ok(detail_content(record))
    }

    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<WatchProviders, ProvidersError> {
        self.fetch(&format!("/{}/{}/watch/providers", media_type, id), &[])
            .await
    }

    async fn trending(
        &self,
        media_type: MediaType,
        language: &str,
    ) -> Result<Vec<Content>, ProvidersError> {
        let page: TrendingPage = self
            .fetch(&format!("/trending/{}/day", media_type), &[("language", language)])
            .await?;
        Ok(trending_contents(media_type, page.results))
    }
}
