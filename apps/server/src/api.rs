use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use watchfinder_providers::{
    DetailResponse, HomeLimit, HomeResponse, MediaType, MovieProvidersResponse, MovieQuery,
    MovieSummary, RateDecision, RateLimiter, SearchResponse, TrendingResponse,
};

use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

const FALLBACK_CLIENT_KEY: &str = "127.0.0.1";
const MAX_QUERY_CHARS: usize = 200;

/// Identify the caller for rate limiting: first `x-forwarded-for` hop, then
/// `x-real-ip`, then loopback.
pub fn client_key(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return first.to_string();
    }
    header("x-real-ip")
        .unwrap_or(FALLBACK_CLIENT_KEY)
        .to_string()
}

fn admit(limiter: &RateLimiter, headers: &HeaderMap) -> ApiResult<()> {
    match limiter.check(&client_key(headers)) {
        RateDecision::Allowed { .. } => Ok(()),
        RateDecision::Limited { retry_after_secs } => {
            Err(ApiError::RateLimited { retry_after_secs })
        }
    }
}

fn parse_query(raw: Option<&str>) -> ApiResult<String> {
    let query = raw.map(str::trim).unwrap_or_default();
    let chars = query.chars().count();
    if chars == 0 || chars > MAX_QUERY_CHARS {
        return Err(ApiError::BadRequest(format!(
            "query must be between 1 and {} characters",
            MAX_QUERY_CHARS
        )));
    }
    Ok(query.to_string())
}

fn parse_id(raw: &str) -> ApiResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest("id must be a positive integer".to_string())),
    }
}

fn parse_media_type(raw: Option<&str>) -> ApiResult<MediaType> {
    raw.unwrap_or_default()
        .parse()
        .map_err(ApiError::BadRequest)
}

pub async fn healthz() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct MovieParams {
    query: Option<String>,
    id: Option<String>,
}

impl MovieParams {
    fn into_query(self) -> ApiResult<MovieQuery> {
        if let Some(id) = self.id.as_deref() {
            return parse_id(id).map(MovieQuery::Id);
        }
        match self.query.as_deref() {
            Some(raw) => parse_query(Some(raw)).map(MovieQuery::Title),
            None => Err(ApiError::BadRequest(
                "query is required when id is not provided".to_string(),
            )),
        }
    }
}

async fn movie_providers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<MovieParams>,
) -> ApiResult<Json<MovieProvidersResponse>> {
    admit(&state.limiters.movie, &headers)?;
    let query = params.into_query()?;

    let cache_key = query.cache_key();
    if let Some(mut cached) = state.caches.movie.get(&cache_key) {
        cached.from_cache = true;
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Err(ApiError::NoApiKey);
    }

    let response = state.lookup.movie_providers(&query).await?;
    state.caches.movie.set(cache_key, response.clone());
    Ok(Json(response))
}

#[derive(Deserialize)]
struct DetailParams {
    #[serde(rename = "type")]
    media_type: Option<String>,
    id: Option<String>,
}

async fn content_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<DetailParams>,
) -> ApiResult<Json<DetailResponse>> {
    admit(&state.limiters.detail, &headers)?;
    let media_type = parse_media_type(params.media_type.as_deref())?;
    let id = parse_id(params.id.as_deref().unwrap_or_default())?;

    let cache_key = format!("detail:v1:{}:{}:{}", media_type, id, state.language());
    if let Some(mut cached) = state.caches.detail.get(&cache_key) {
        cached.from_cache = true;
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Err(ApiError::NoApiKey);
    }

    let response = state.lookup.content_detail(media_type, id).await?;
    state.caches.detail.set(cache_key, response.clone());
    Ok(Json(response))
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    admit(&state.limiters.search, &headers)?;
    let query = parse_query(params.query.as_deref())?;

    let cache_key = format!("search:v1:{}", query.to_lowercase());
    if let Some(cached) = state.caches.search.get(&cache_key) {
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Ok(Json(SearchResponse {
            query,
            results: Vec::new(),
        }));
    }

    let response = state.lookup.search(&query).await?;
    state.caches.search.set(cache_key, response.clone());
    Ok(Json(response))
}

async fn suggest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<MovieSummary>>> {
    admit(&state.limiters.suggest, &headers)?;
    let query = parse_query(params.query.as_deref())?;

    let cache_key = format!("suggest:{}", query.to_lowercase());
    if let Some(cached) = state.caches.suggest.get(&cache_key) {
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Ok(Json(Vec::new()));
    }

    let response = state.lookup.suggest(&query).await?;
    state.caches.suggest.set(cache_key, response.clone());
    Ok(Json(response))
}

#[derive(Deserialize)]
struct TrendingParams {
    #[serde(rename = "type")]
    media_type: Option<String>,
}

async fn trending(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<TrendingParams>,
) -> ApiResult<Json<TrendingResponse>> {
    admit(&state.limiters.trending, &headers)?;
    let media_type = parse_media_type(params.media_type.as_deref())?;

    let cache_key = format!("trending:day:{}:{}", media_type, state.language());
    if let Some(cached) = state.caches.trending.get(&cache_key) {
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Ok(Json(TrendingResponse {
            media_type,
            results: Vec::new(),
        }));
    }

    let response = state.lookup.trending(media_type).await?;
    state.caches.trending.set(cache_key, response.clone());
    Ok(Json(response))
}

#[derive(Deserialize)]
struct HomeParams {
    limit: Option<String>,
}

async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HomeParams>,
) -> ApiResult<Json<HomeResponse>> {
    admit(&state.limiters.home, &headers)?;
    let limit = match params.limit.as_deref() {
        None => HomeLimit::default(),
        Some(raw) => {
            let value: i64 = raw.trim().parse().map_err(|_| {
                ApiError::BadRequest("limit must be an integer".to_string())
            })?;
            HomeLimit::new(value)?
        }
    };

    let cache_key = format!("home:v1:{}:limit={}", state.language(), limit.get());
    if let Some(mut cached) = state.caches.home.get(&cache_key) {
        cached.from_cache = true;
        return Ok(Json(cached));
    }
    if !state.has_api_key() {
        return Ok(Json(HomeResponse::default()));
    }

    let response = state.lookup.home(limit).await?;
    state.caches.home.set(cache_key, response.clone());
    Ok(Json(response))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/movie", get(movie_providers))
        .route("/detail", get(content_detail))
        .route("/search", get(search))
        .route("/suggest", get(suggest))
        .route("/trending", get(trending))
        .route("/home", get(home));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
