use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use watchfinder_providers::{
    ContentSource, DetailResponse, HomeResponse, LanguagePolicy, LookupService,
    MovieProvidersResponse, MovieSummary, ProviderCatalog, ProviderNormalizer, RateLimiter,
    RegionPolicy, SearchResponse, TmdbSource, TrendingResponse, TtlCache,
};

use crate::config::Config;

const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Per-route request budgets within [`RATE_WINDOW`].
pub const MOVIE_RATE_LIMIT: u32 = 30;
pub const SUGGEST_RATE_LIMIT: u32 = 30;
pub const DETAIL_RATE_LIMIT: u32 = 60;
pub const SEARCH_RATE_LIMIT: u32 = 60;
pub const HOME_RATE_LIMIT: u32 = 60;
pub const TRENDING_RATE_LIMIT: u32 = 120;

/// One fixed-window limiter per route, keyed by client address.
pub struct RouteLimiters {
    pub movie: RateLimiter,
    pub detail: RateLimiter,
    pub search: RateLimiter,
    pub suggest: RateLimiter,
    pub trending: RateLimiter,
    pub home: RateLimiter,
}

impl RouteLimiters {
    fn new() -> Self {
        Self {
            movie: RateLimiter::new(MOVIE_RATE_LIMIT, RATE_WINDOW),
            detail: RateLimiter::new(DETAIL_RATE_LIMIT, RATE_WINDOW),
            search: RateLimiter::new(SEARCH_RATE_LIMIT, RATE_WINDOW),
            suggest: RateLimiter::new(SUGGEST_RATE_LIMIT, RATE_WINDOW),
            trending: RateLimiter::new(TRENDING_RATE_LIMIT, RATE_WINDOW),
            home: RateLimiter::new(HOME_RATE_LIMIT, RATE_WINDOW),
        }
    }
}

/// One response cache per route.
pub struct ResponseCaches {
    pub movie: TtlCache<MovieProvidersResponse>,
    pub detail: TtlCache<DetailResponse>,
    pub search: TtlCache<SearchResponse>,
    pub suggest: TtlCache<Vec<MovieSummary>>,
    pub trending: TtlCache<TrendingResponse>,
    pub home: TtlCache<HomeResponse>,
}

impl ResponseCaches {
    fn new(ttl: Duration) -> Self {
        Self {
            movie: TtlCache::new(ttl),
            detail: TtlCache::new(ttl),
            search: TtlCache::new(ttl),
            suggest: TtlCache::new(ttl),
            trending: TtlCache::new(ttl),
            home: TtlCache::new(ttl),
        }
    }
}

pub struct AppState {
    pub lookup: LookupService<dyn ContentSource>,
    pub limiters: RouteLimiters,
    pub caches: ResponseCaches,
}

impl AppState {
    /// Whether upstream lookups can run at all.
    pub fn has_api_key(&self) -> bool {
        self.lookup.source().is_configured()
    }

    /// Primary request language, part of several cache keys.
    pub fn language(&self) -> &str {
        &self.lookup.languages().primary
    }
}

pub fn init_tracing() {
    let log_format =
        std::env::var("WATCHFINDER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let source = TmdbSource::new(config.tmdb_api_key.clone());
    if !source.is_configured() {
        tracing::warn!("TMDB_API_KEY is not set; lookups will be unavailable");
    }
    build_state_with_source(config, Arc::new(source))
}

/// Assemble state around an arbitrary content source.
pub fn build_state_with_source(
    config: &Config,
    source: Arc<dyn ContentSource>,
) -> anyhow::Result<Arc<AppState>> {
    let catalog = match &config.catalog_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read provider catalog {}", path))?;
            let catalog = ProviderCatalog::from_json(&json)?;
            tracing::info!("Loaded {} providers from {}", catalog.len(), path);
            catalog
        }
        None => ProviderCatalog::whitelist().clone(),
    };

    let policy = RegionPolicy {
        primary_region: config.primary_region.clone(),
        fallback_region: config.fallback_region.clone(),
        ..RegionPolicy::default()
    };
    let normalizer = ProviderNormalizer::new(Arc::new(catalog), policy);
    let languages = LanguagePolicy {
        primary: config.language.clone(),
        fallback: config.fallback_language.clone(),
    };

    Ok(Arc::new(AppState {
        lookup: LookupService::new(source, normalizer, languages),
        limiters: RouteLimiters::new(),
        caches: ResponseCaches::new(config.cache_ttl),
    }))
}
