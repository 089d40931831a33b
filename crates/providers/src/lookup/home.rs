//! Landing page shelves.

use futures::{stream, StreamExt, TryStreamExt};

use super::LookupService;
use crate::errors::ProvidersError;
use crate::models::{Content, HomeResponse, MediaType};
use crate::schema::CountryProviders;
use crate::source::ContentSource;

/// Trending titles considered per media type before splitting.
pub const HOME_CANDIDATES: usize = 30;
/// Maximum concurrent watch-provider lookups while classifying movies.
pub const HOME_MOVIE_CONCURRENCY: usize = 5;

/// Length of each landing page shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeLimit(usize);

impl HomeLimit {
    pub const MIN: usize = 1;
    pub const MAX: usize = 20;

    pub fn new(limit: i64) -> Result<Self, ProvidersError> {
        match usize::try_from(limit) {
            Ok(limit) if (Self::MIN..=Self::MAX).contains(&limit) => Ok(Self(limit)),
            _ => Err(ProvidersError::InvalidInput(format!(
                "limit must be between {} and {}",
                Self::MIN,
                Self::MAX
            ))),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for HomeLimit {
    fn default() -> Self {
        Self(10)
    }
}

impl<S: ContentSource + ?Sized> LookupService<S> {
    /// Split today's trending titles into four shelves.
    ///
    /// Series are domestic when their origin countries include the primary
    /// region or their original language is the primary language. Movies
    /// are OTT when the primary region lists any provider in any tier.
    pub async fn home(&self, limit: HomeLimit) -> Result<HomeResponse, ProvidersError> {
        let (movies, series) = futures::try_join!(
            self.trending_top(MediaType::Movie, HOME_CANDIDATES),
            self.trending_top(MediaType::Tv, HOME_CANDIDATES),
        )?;

        let (domestic_tv, global_tv): (Vec<_>, Vec<_>) =
            series.into_iter().partition(|content| self.is_domestic(content));

        let region = self.normalizer.policy().primary_region.as_str();
        let movie_ids: Vec<u64> = movies.iter().map(|movie| movie.id).collect();
        let streamable: Vec<bool> = stream::iter(
            movie_ids
                .into_iter()
                .map(|id| self.source.watch_providers(MediaType::Movie, id)),
        )
        .buffered(HOME_MOVIE_CONCURRENCY)
        .map_ok(|providers| providers.region(region).is_some_and(CountryProviders::has_any))
        .try_collect()
        .await?;

        let mut ott_movies = Vec::new();
        let mut theater_movies = Vec::new();
        for (movie, streamable) in movies.into_iter().zip(streamable) {
            if streamable {
                ott_movies.push(movie);
            } else {
                theater_movies.push(movie);
            }
        }

        let limit = limit.get();
        Ok(HomeResponse {
            ott_movies: truncated(ott_movies, limit),
            theater_movies: truncated(theater_movies, limit),
            domestic_tv: truncated(domestic_tv, limit),
            global_tv: truncated(global_tv, limit),
            from_cache: false,
        })
    }

    fn is_domestic(&self, content: &Content) -> bool {
        let region = &self.normalizer.policy().primary_region;
        let from_region = content
            .origin_country
            .as_ref()
            .is_some_and(|countries| countries.iter().any(|c| c == region));
        from_region || content.original_language.as_deref() == Some(self.languages.primary_code())
    }
}

fn truncated(mut items: Vec<Content>, limit: usize) -> Vec<Content> {
    items.truncate(limit);
    items
}
