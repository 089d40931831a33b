use serde::{Deserialize, Serialize};

use super::UpstreamSchema;

/// A movie as returned by `/search/movie` rows and `/movie/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl UpstreamSchema for MovieRecord {
    const NAME: &'static str = "movie_detail";
}

/// A series as returned by `/tv/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl UpstreamSchema for TvRecord {
    const NAME: &'static str = "tv_detail";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchPage {
    pub results: Vec<MovieRecord>,
}

impl UpstreamSchema for MovieSearchPage {
    const NAME: &'static str = "movie_search";
}

/// One `/search/multi` row. Movies carry `title`/`release_date`, series carry
/// `name`/`first_air_date`; people and other media types are filtered later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSearchRow {
    pub id: u64,
    pub media_type: String,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSearchPage {
    pub results: Vec<MultiSearchRow>,
}

impl UpstreamSchema for MultiSearchPage {
    const NAME: &'static str = "multi_search";
}

/// One `/trending/{media}/day` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRow {
    pub id: u64,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub origin_country: Option<Vec<String>>,
    #[serde(default)]
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingPage {
    pub results: Vec<TrendingRow>,
}

impl UpstreamSchema for TrendingPage {
    const NAME: &'static str = "trending";
}
