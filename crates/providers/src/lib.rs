//! Watchfinder Providers Crate
//!
//! This crate answers "where can I watch this?" for movies and series,
//! restricted to a curated whitelist of streaming services.
//!
//! # Overview
//!
//! The providers crate supports:
//! - A curated provider catalog with alias matching and display order
//! - Normalization of per-region upstream provider lists
//! - Primary/fallback region policy (KR first, US when KR is missing)
//! - TTL caching and fixed-window rate limiting for the HTTP layer
//! - Typed, validated upstream payloads
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  LookupService   | --> |  ContentSource   |  (TMDB, or a fake in tests)
//! +------------------+     +------------------+
//!          |                        |
//!          |                        v
//!          |               +------------------+
//!          |               |  schema::validate|  (typed upstream payloads)
//!          |               +------------------+
//!          v
//! +--------------------+     +------------------+
//! | ProviderNormalizer | --> | ProviderCatalog  |  (whitelist + order)
//! +--------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! | RegionResolution |  (primary region + optional fallback)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProviderCatalog`] - Whitelisted providers and their aliases
//! - [`ProviderNormalizer`] - Raw upstream lists to [`RegionProviders`]
//! - [`TtlCache`] - In-memory cache with a fixed time-to-live
//! - [`RateLimiter`] - Per-key fixed-window limiter
//! - [`LookupService`] - Orchestrates source and normalizer into response payloads

pub mod catalog;
pub mod errors;
pub mod guard;
pub mod images;
pub mod lookup;
pub mod models;
pub mod normalizer;
pub mod schema;
pub mod source;

pub use catalog::{
    normalize_provider_name, ProviderCatalog, ProviderConfig, ProviderKey, ProviderKeyed,
};
pub use errors::{ErrorKind, ProvidersError};
pub use guard::{RateDecision, RateLimiter, TtlCache};
pub use lookup::{HomeLimit, LanguagePolicy, LookupService, MovieQuery};
pub use models::{
    Content, DetailResponse, HomeResponse, MediaType, MovieProvidersResponse, MovieSummary,
    PaidProviders, ProviderView, RegionProviders, RegionResolution, SearchResponse,
    TrendingResponse,
};
pub use normalizer::{ProviderNormalizer, RegionPolicy};
pub use source::{ContentSource, TmdbSource};
