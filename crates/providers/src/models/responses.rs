use serde::{Deserialize, Serialize};

use super::content::{Content, MediaType, MovieSummary};
use super::view::RegionResolution;

/// Movie lookup by title or id, with provider availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieProvidersResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub movie: MovieSummary,
    #[serde(flatten)]
    pub providers: RegionResolution,
    pub from_cache: bool,
}

/// Movie or series detail, with provider availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub providers: RegionResolution,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub results: Vec<Content>,
}

/// Landing page shelves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    /// Trending movies with any availability in the primary region.
    pub ott_movies: Vec<Content>,
    /// Trending movies without primary-region availability.
    pub theater_movies: Vec<Content>,
    #[serde(rename = "krTv")]
    pub domestic_tv: Vec<Content>,
    pub global_tv: Vec<Content>,
    pub from_cache: bool,
}
