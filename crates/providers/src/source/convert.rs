//! Mapping from upstream rows to [`Content`].

use std::cmp::Ordering;

use crate::models::{Content, MediaType};
use crate::schema::{MovieRecord, MultiSearchRow, TrendingRow, TvRecord};

/// Placeholder for trending rows without a usable title.
pub const UNTITLED: &str = "(제목 없음)";

fn by_popularity_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0)
        .partial_cmp(&a.unwrap_or(0.0))
        .unwrap_or(Ordering::Equal)
}

/// Movies and series from a multi search, most popular first.
///
/// Rows of other media types and rows with a blank title are dropped.
pub fn multi_search_contents(mut rows: Vec<MultiSearchRow>) -> Vec<Content> {
    rows.sort_by(|a, b| by_popularity_desc(a.popularity, b.popularity));
    rows.into_iter().filter_map(multi_search_content).collect()
}

fn multi_search_content(row: MultiSearchRow) -> Option<Content> {
    let media_type: MediaType = row.media_type.parse().ok()?;
    let title = match media_type {
        MediaType::Movie => row.title,
        MediaType::Tv => row.name,
    }
    .unwrap_or_default();
    if title.trim().is_empty() {
        return None;
    }

    Some(Content {
        id: row.id,
        title,
        media_type,
        poster_path: row.poster_path.unwrap_or_default(),
        overview: row.overview.unwrap_or_default(),
        release_date: row.release_date,
        first_air_date: row.first_air_date,
        origin_country: None,
        original_language: None,
    })
}

/// Trending titles of one media type, most popular first.
///
/// Blank titles become [`UNTITLED`]. Date and origin fields that do not
/// belong to `media_type` are dropped.
pub fn trending_contents(media_type: MediaType, mut rows: Vec<TrendingRow>) -> Vec<Content> {
    rows.sort_by(|a, b| by_popularity_desc(a.popularity, b.popularity));
    rows.into_iter()
        .map(|row| {
            let (title, release_date, first_air_date, origin_country, original_language) =
                match media_type {
                    MediaType::Movie => (row.title, row.release_date, None, None, None),
                    MediaType::Tv => (
                        row.name,
                        None,
                        row.first_air_date,
                        row.origin_country,
                        row.original_language,
                    ),
                };
            let title = title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());

            Content {
                id: row.id,
                title,
                media_type,
                poster_path: row.poster_path.unwrap_or_default(),
                overview: row.overview.unwrap_or_default(),
                release_date,
                first_air_date,
                origin_country,
                original_language,
            }
        })
        .collect()
}

/// Detail record for either media type.
pub enum DetailRecord {
    Movie(MovieRecord),
    Tv(TvRecord),
}

pub fn detail_content(record: DetailRecord) -> Content {
    match record {
        DetailRecord::Movie(movie) => Content {
            id: movie.id,
            title: movie.title,
            media_type: MediaType::Movie,
            poster_path: movie.poster_path.unwrap_or_default(),
            overview: movie.overview.unwrap_or_default(),
            release_date: movie.release_date,
            first_air_date: None,
            origin_country: None,
            original_language: None,
        },
        DetailRecord::Tv(tv) => Content {
            id: tv.id,
            title: tv.name,
            media_type: MediaType::Tv,
            poster_path: tv.poster_path.unwrap_or_default(),
            overview: tv.overview.unwrap_or_default(),
            release_date: None,
            first_air_date: tv.first_air_date,
            origin_country: None,
            original_language: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::schema::{validate, MultiSearchPage, TrendingPage};

    #[test]
    fn test_multi_search_filters_and_sorts() {
        let page: MultiSearchPage = validate(
            r#"{"results": [
                {"id": 1, "media_type": "movie", "popularity": 3.5, "title": "Parasite", "release_date": "2019-05-30"},
                {"id": 2, "media_type": "person", "popularity": 99.0, "name": "Bong Joon-ho"},
                {"id": 3, "media_type": "tv", "popularity": 10.0, "name": "Squid Game", "poster_path": "/sq.jpg"},
                {"id": 4, "media_type": "movie", "popularity": 50.0, "title": "  "},
                {"id": 5, "media_type": "tv", "name": "No Popularity"}
            ]}"#,
        )
        .unwrap();

        let contents = multi_search_contents(page.results);
        let ids: Vec<u64> = contents.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 5]);

        assert_eq!(contents[0].media_type, MediaType::Tv);
        assert_eq!(contents[0].title, "Squid Game");
        assert_eq!(contents[0].poster_path, "/sq.jpg");
        assert_eq!(contents[1].release_date.as_deref(), Some("2019-05-30"));
        assert_eq!(contents[2].overview, "");
    }

    #[test]
    fn test_multi_search_uses_title_field_matching_media_type() {
        let page: MultiSearchPage = validate(
            r#"{"results": [
                {"id": 1, "media_type": "movie", "name": "Wrong field"},
                {"id": 2, "media_type": "tv", "title": "Wrong field"}
            ]}"#,
        )
        .unwrap();
        assert!(multi_search_contents(page.results).is_empty());
    }

    #[test]
    fn test_trending_tv_keeps_origin_and_placeholder_title() {
        let page: TrendingPage = validate(
            r#"{"results": [
                {"id": 10, "popularity": 1.0, "name": "", "origin_country": ["KR"], "original_language": "ko"},
                {"id": 11, "popularity": 7.0, "name": "The Bear", "first_air_date": "2022-06-23", "release_date": "ignored"}
            ]}"#,
        )
        .unwrap();

        let contents = trending_contents(MediaType::Tv, page.results);
        assert_eq!(contents[0].id, 11);
        assert_eq!(contents[0].first_air_date.as_deref(), Some("2022-06-23"));
        assert_eq!(contents[0].release_date, None);
        assert_eq!(contents[1].title, UNTITLED);
        assert_eq!(contents[1].origin_country, Some(vec!["KR".to_string()]));
        assert_eq!(contents[1].original_language.as_deref(), Some("ko"));
    }

    #[test]
    fn test_trending_movie_drops_tv_fields() {
        let page: TrendingPage = validate(
            r#"{"results": [
                {"id": 20, "title": "Dune", "release_date": "2021-09-15", "origin_country": ["US"], "original_language": "en"}
            ]}"#,
        )
        .unwrap();

        let contents = trending_contents(MediaType::Movie, page.results);
        assert_eq!(contents[0].title, "Dune");
        assert_eq!(contents[0].origin_country, None);
        assert_eq!(contents[0].original_language, None);
    }

    #[test]
    fn test_detail_content_for_series() {
        let content = detail_content(DetailRecord::Tv(TvRecord {
            id: 93405,
            name: "오징어 게임".to_string(),
            first_air_date: Some("2021-09-17".to_string()),
            poster_path: None,
            overview: None,
        }));
        assert_eq!(content.media_type, MediaType::Tv);
        assert_eq!(content.premiere_date(), Some("2021-09-17"));
        assert_eq!(content.poster_path, "");
    }
}
