//! Lookup orchestration.
//!
//! [`LookupService`] combines a [`ContentSource`] with a [`ProviderNormalizer`]
//! and produces the response payloads. It holds no cache and no limiter;
//! callers own those.

mod home;

pub use home::{HomeLimit, HOME_CANDIDATES, HOME_MOVIE_CONCURRENCY};

use std::sync::Arc;

use log::debug;

use crate::errors::ProvidersError;
use crate::images::{poster_url, release_year, PosterSize};
use crate::models::{
    Content, DetailResponse, MediaType, MovieProvidersResponse, MovieSummary, SearchResponse,
    TrendingResponse,
};
use crate::normalizer::ProviderNormalizer;
use crate::schema::MovieRecord;
use crate::source::ContentSource;

/// Number of suggestions returned by [`LookupService::suggest`].
pub const SUGGEST_LIMIT: usize = 5;
/// Number of titles returned by [`LookupService::trending`].
pub const TRENDING_LIMIT: usize = 10;

/// How a movie is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    Id(u64),
    Title(String),
}

impl MovieQuery {
    /// Cache key for this query. Titles are compared case-insensitively.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Id(id) => format!("movie:id:{}", id),
            Self::Title(title) => format!("movie:query:{}", title.to_lowercase()),
        }
    }
}

/// Request languages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguagePolicy {
    /// Language for every request, e.g. `ko-KR`.
    pub primary: String,
    /// Language retried when a search in the primary language is empty.
    pub fallback: String,
}

impl Default for LanguagePolicy {
    fn default() -> Self {
        Self {
            primary: "ko-KR".to_string(),
            fallback: "en-US".to_string(),
        }
    }
}

impl LanguagePolicy {
    /// ISO 639-1 part of the primary language (`ko` for `ko-KR`).
    pub fn primary_code(&self) -> &str {
        self.primary.split('-').next().unwrap_or(&self.primary)
    }
}

pub struct LookupService<S: ContentSource + ?Sized> {
    source: Arc<S>,
    normalizer: ProviderNormalizer,
    languages: LanguagePolicy,
}

impl<S: ContentSource + ?Sized> LookupService<S> {
    pub fn new(source: Arc<S>, normalizer: ProviderNormalizer, languages: LanguagePolicy) -> Self {
        Self {
            source,
            normalizer,
            languages,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn normalizer(&self) -> &ProviderNormalizer {
        &self.normalizer
    }

    pub fn languages(&self) -> &LanguagePolicy {
        &self.languages
    }

    /// Movie search in the primary language and region, retried in the
    /// fallback language and region when empty.
    async fn search_movies_with_fallback(
        &self,
        query: &str,
    ) -> Result<Vec<MovieRecord>, ProvidersError> {
        let policy = self.normalizer.policy();
        let results = self
            .source
            .search_movies(query, &self.languages.primary, Some(&policy.primary_region))
            .await?;
        if !results.is_empty() {
            return Ok(results);
        }

        debug!(
            "No {} results for '{}', retrying in {}",
            self.languages.primary, query, self.languages.fallback
        );
        self.source
            .search_movies(query, &self.languages.fallback, Some(&policy.fallback_region))
            .await
    }

    /// Resolve a movie and its provider availability.
    ///
    /// Title queries pick the top search result. No result is
    /// [`ProvidersError::NotFound`].
    pub async fn movie_providers(
        &self,
        query: &MovieQuery,
    ) -> Result<MovieProvidersResponse, ProvidersError> {
        let (movie_id, title_query) = match query {
            MovieQuery::Id(id) => (*id, None),
            MovieQuery::Title(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(ProvidersError::InvalidInput(
                        "query is required when id is not provided".to_string(),
                    ));
                }
                let top = self
                    .search_movies_with_fallback(title)
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        ProvidersError::NotFound("No results found for that title.".to_string())
                    })?;
                (top.id, Some(title.to_string()))
            }
        };

        let (movie, providers) = futures::try_join!(
            self.source.movie(movie_id, &self.languages.primary),
            self.source.watch_providers(MediaType::Movie, movie_id),
        )?;

        Ok(MovieProvidersResponse {
            query: title_query,
            movie: MovieSummary {
                id: movie.id,
                title: movie.title,
                year: release_year(movie.release_date.as_deref()),
                poster_url: poster_url(movie.poster_path.as_deref(), PosterSize::W342),
            },
            providers: self.normalizer.resolve_regions(&providers),
            from_cache: false,
        })
    }

    /// Detail card for a movie or series with provider availability.
    pub async fn content_detail(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<DetailResponse, ProvidersError> {
        let (content, providers) = futures::try_join!(
            self.source
                .content_detail(media_type, id, &self.languages.primary),
            self.source.watch_providers(media_type, id),
        )?;

        Ok(DetailResponse {
            year: release_year(content.premiere_date()),
            poster_url: poster_url(Some(content.poster_path.as_str()), PosterSize::W342),
            content,
            providers: self.normalizer.resolve_regions(&providers),
            from_cache: false,
        })
    }

    /// Movie and series search, retried in the fallback language when empty.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, ProvidersError> {
        let mut results = self
            .source
            .search_multi(query, &self.languages.primary)
            .await?;
        if results.is_empty() {
            results = self
                .source
                .search_multi(query, &self.languages.fallback)
                .await?;
        }

        Ok(SearchResponse {
            query: query.to_string(),
            results,
        })
    }

    /// Up to [`SUGGEST_LIMIT`] movie cards for type-ahead.
    pub async fn suggest(&self, query: &str) -> Result<Vec<MovieSummary>, ProvidersError> {
        let results = self.search_movies_with_fallback(query).await?;

        Ok(results
            .into_iter()
            .take(SUGGEST_LIMIT)
            .map(|movie| MovieSummary {
                id: movie.id,
                year: release_year(movie.release_date.as_deref()),
                poster_url: poster_url(movie.poster_path.as_deref(), PosterSize::W185),
                title: movie.title,
            })
            .collect())
    }

    /// Today's top [`TRENDING_LIMIT`] titles of one media type.
    pub async fn trending(&self, media_type: MediaType) -> Result<TrendingResponse, ProvidersError> {
        let results = self.trending_top(media_type, TRENDING_LIMIT).await?;
        Ok(TrendingResponse {
            media_type,
            results,
        })
    }

    async fn trending_top(
        &self,
        media_type: MediaType,
        limit: usize,
    ) -> Result<Vec<Content>, ProvidersError> {
        let mut results = self
            .source
            .trending(media_type, &self.languages.primary)
            .await?;
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::testing::FakeSource;
    use super::*;

    use crate::catalog::ProviderKey;
    use crate::normalizer::DEFAULT_MISSING_PRIMARY_MESSAGE;
    use crate::schema::{CountryProviders, RawProviderRecord, WatchProviders};

    fn service(source: FakeSource) -> LookupService<FakeSource> {
        LookupService::new(
            Arc::new(source),
            ProviderNormalizer::default(),
            LanguagePolicy::default(),
        )
    }

    fn movie(id: u64, title: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            release_date: Some("2019-05-30".to_string()),
            poster_path: Some("/poster.jpg".to_string()),
            overview: None,
        }
    }

    fn kr_netflix() -> WatchProviders {
        WatchProviders::default().with_region(
            "KR",
            CountryProviders {
                link: Some("https://www.themoviedb.org/movie/496243/watch?locale=KR".to_string()),
                flatrate: vec![RawProviderRecord::new(8, "Netflix")],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_movie_query_cache_key() {
        assert_eq!(MovieQuery::Id(42).cache_key(), "movie:id:42");
        assert_eq!(
            MovieQuery::Title("Parasite".to_string()).cache_key(),
            "movie:query:parasite"
        );
    }

    #[test]
    fn test_primary_code() {
        assert_eq!(LanguagePolicy::default().primary_code(), "ko");
    }

    #[tokio::test]
    async fn test_movie_providers_by_title_uses_top_result() {
        let source = FakeSource::default()
            .with_movie_search("ko-KR", vec![movie(496243, "기생충"), movie(1, "Other")])
            .with_movie(movie(496243, "기생충"))
            .with_watch_providers(MediaType::Movie, 496243, kr_netflix());

        let response = service(source)
            .movie_providers(&MovieQuery::Title("  기생충 ".to_string()))
            .await
            .unwrap();

        assert_eq!(response.query.as_deref(), Some("기생충"));
        assert_eq!(response.movie.id, 496243);
        assert_eq!(response.movie.year, Some(2019));
        assert_eq!(
            response.movie.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w342/poster.jpg")
        );
        let primary = &response.providers.primary;
        assert_eq!(primary.country, "KR");
        assert_eq!(primary.primary_providers[0].key, ProviderKey::Netflix);
        assert!(response.providers.fallback.is_none());
        assert!(!response.from_cache);
    }

    #[tokio::test]
    async fn test_movie_title_search_falls_back_to_english() {
        let source = FakeSource::default()
            .with_movie_search("en-US", vec![movie(27205, "Inception")])
            .with_movie(movie(27205, "Inception"))
            .with_watch_providers(MediaType::Movie, 27205, WatchProviders::default());

        let service = service(source);
        let response = service
            .movie_providers(&MovieQuery::Title("Inception".to_string()))
            .await
            .unwrap();

        assert_eq!(response.movie.id, 27205);
        assert_eq!(
            service.source().searches(),
            vec![
                ("ko-KR".to_string(), Some("KR".to_string())),
                ("en-US".to_string(), Some("US".to_string())),
            ]
        );
        let primary = &response.providers.primary;
        assert!(!primary.exists);
        assert_eq!(primary.message.as_deref(), Some(DEFAULT_MISSING_PRIMARY_MESSAGE));
    }

    #[tokio::test]
    async fn test_movie_title_without_results_is_not_found() {
        let err = service(FakeSource::default())
            .movie_providers(&MovieQuery::Title("zzzz".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvidersError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_movie_by_id_skips_search() {
        let source = FakeSource::default()
            .with_movie(movie(11216, "올드보이"))
            .with_watch_providers(MediaType::Movie, 11216, kr_netflix());

        let service = service(source);
        let response = service.movie_providers(&MovieQuery::Id(11216)).await.unwrap();

        assert_eq!(response.query, None);
        assert_eq!(response.movie.title, "올드보이");
        assert!(service.source().searches().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let source = FakeSource::default().with_movie(movie(7, "No providers"));
        let err = service(source)
            .movie_providers(&MovieQuery::Id(7))
            .await
            .unwrap_err();
        assert!(matches!(err, ProvidersError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_content_detail_for_series_with_us_fallback() {
        let content = Content {
            id: 1396,
            title: "Breaking Bad".to_string(),
            media_type: MediaType::Tv,
            poster_path: "/bb.jpg".to_string(),
            overview: String::new(),
            release_date: None,
            first_air_date: Some("2008-01-20".to_string()),
            origin_country: None,
            original_language: None,
        };
        let providers = WatchProviders::default().with_region(
            "US",
            CountryProviders {
                flatrate: vec![RawProviderRecord::new(8, "Netflix")],
                ..Default::default()
            },
        );
        let source = FakeSource::default()
            .with_detail(content)
            .with_watch_providers(MediaType::Tv, 1396, providers);

        let response = service(source)
            .content_detail(MediaType::Tv, 1396)
            .await
            .unwrap();

        assert_eq!(response.year, Some(2008));
        assert_eq!(
            response.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w342/bb.jpg")
        );
        assert!(!response.providers.primary.exists);
        let fallback = response.providers.fallback.expect("fallback region");
        assert_eq!(fallback.country, "US");
        assert_eq!(fallback.primary_providers.len(), 1);
    }

    #[tokio::test]
    async fn test_search_falls_back_to_english() {
        let source = FakeSource::default().with_multi_search(
            "en-US",
            vec![FakeSource::content(1, MediaType::Movie, "Inception")],
        );

        let response = service(source).search("Inception").await.unwrap();
        assert_eq!(response.query, "Inception");
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_returns_top_five_small_posters() {
        let results = (1..=8).map(|id| movie(id, "Movie")).collect();
        let source = FakeSource::default().with_movie_search("ko-KR", results);

        let suggestions = service(source).suggest("movie").await.unwrap();
        assert_eq!(suggestions.len(), SUGGEST_LIMIT);
        assert_eq!(suggestions[0].id, 1);
        assert_eq!(
            suggestions[0].poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w185/poster.jpg")
        );
    }

    #[tokio::test]
    async fn test_trending_truncates() {
        let rows = (1..=20)
            .map(|id| FakeSource::content(id, MediaType::Movie, "Trending"))
            .collect();
        let source = FakeSource::default().with_trending(MediaType::Movie, rows);

        let response = service(source).trending(MediaType::Movie).await.unwrap();
        assert_eq!(response.media_type, MediaType::Movie);
        assert_eq!(response.results.len(), TRENDING_LIMIT);
        assert_eq!(response.results[0].id, 1);
    }
}
