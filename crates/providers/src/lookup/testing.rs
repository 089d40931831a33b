//! In-memory [`ContentSource`] for lookup tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::ProvidersError;
use crate::models::{Content, MediaType};
use crate::schema::{MovieRecord, WatchProviders};
use crate::source::ContentSource;

#[derive(Default)]
pub struct FakeSource {
    movie_searches: HashMap<String, Vec<MovieRecord>>,
    multi_searches: HashMap<String, Vec<Content>>,
    movies: HashMap<u64, MovieRecord>,
    details: HashMap<(MediaType, u64), Content>,
    watch_providers: HashMap<(MediaType, u64), WatchProviders>,
    trending: HashMap<MediaType, Vec<Content>>,
    searches: Mutex<Vec<(String, Option<String>)>>,
    watch_provider_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

fn not_found() -> ProvidersError {
    ProvidersError::Upstream {
        status: 404,
        message: "Not Found".to_string(),
    }
}

impl FakeSource {
    pub fn content(id: u64, media_type: MediaType, title: &str) -> Content {
        Content {
            id,
            title: title.to_string(),
            media_type,
            poster_path: String::new(),
            overview: String::new(),
            release_date: None,
            first_air_date: None,
            origin_country: None,
            original_language: None,
        }
    }

    pub fn with_movie_search(mut self, language: &str, results: Vec<MovieRecord>) -> Self {
        self.movie_searches.insert(language.to_string(), results);
        self
    }

    pub fn with_multi_search(mut self, language: &str, results: Vec<Content>) -> Self {
        self.multi_searches.insert(language.to_string(), results);
        self
    }

    pub fn with_movie(mut self, movie: MovieRecord) -> Self {
        self.movies.insert(movie.id, movie);
        self
    }

    pub fn with_detail(mut self, content: Content) -> Self {
        self.details.insert((content.media_type, content.id), content);
        self
    }

    pub fn with_watch_providers(
        mut self,
        media_type: MediaType,
        id: u64,
        providers: WatchProviders,
    ) -> Self {
        self.watch_providers.insert((media_type, id), providers);
        self
    }

    pub fn with_trending(mut self, media_type: MediaType, results: Vec<Content>) -> Self {
        self.trending.insert(media_type, results);
        self
    }

    /// `(language, region)` of every movie search, in call order.
    pub fn searches(&self) -> Vec<(String, Option<String>)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn watch_provider_calls(&self) -> usize {
        self.watch_provider_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn search_movies(
        &self,
        _query: &str,
        language: &str,
        region: Option<&str>,
    ) -> Result<Vec<MovieRecord>, ProvidersError> {
        self.searches
            .lock()
            .unwrap()
            .push((language.to_string(), region.map(str::to_string)));
        Ok(self.movie_searches.get(language).cloned().unwrap_or_default())
    }

    async fn search_multi(
        &self,
        _query: &str,
        language: &str,
    ) -> Result<Vec<Content>, ProvidersError> {
        Ok(self.multi_searches.get(language).cloned().unwrap_or_default())
    }

    async fn movie(&self, id: u64, _language: &str) -> Result<MovieRecord, ProvidersError> {
        self.movies.get(&id).cloned().ok_or_else(not_found)
    }

    async fn content_detail(
        &self,
        media_type: MediaType,
        id: u64,
        _language: &str,
    ) -> Result<Content, ProvidersError> {
        self.details
            .get(&(media_type, id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn watch_providers(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<WatchProviders, ProvidersError> {
        self.watch_provider_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.watch_providers
            .get(&(media_type, id))
            .cloned()
            .ok_or_else(not_found)
    }

    async fn trending(
        &self,
        media_type: MediaType,
        _language: &str,
    ) -> Result<Vec<Content>, ProvidersError> {
        Ok(self.trending.get(&media_type).cloned().unwrap_or_default())
    }
}
