use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use watchfinder_providers::{ErrorKind, ProvidersError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Too many requests. Try again in ~{retry_after_secs}s.")]
    RateLimited { retry_after_secs: u64 },
    #[error("{0}")]
    BadRequest(String),
    #[error("TMDB API Key is missing.")]
    NoApiKey,
    #[error("{0}")]
    Providers(#[from] ProvidersError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    /// HTTP status and machine-readable code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NoApiKey => (StatusCode::SERVICE_UNAVAILABLE, "NO_TMDB_KEY"),
            ApiError::Providers(e) => match (e, e.kind()) {
                (ProvidersError::MissingApiKey, _) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "NO_TMDB_KEY")
                }
                (_, ErrorKind::Input) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
                (_, ErrorKind::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                (_, ErrorKind::Upstream | ErrorKind::Validation) => {
                    (StatusCode::BAD_GATEWAY, "API_ERROR")
                }
                (_, ErrorKind::Configuration) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "API_ERROR")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }

        let body = Json(ErrorBody {
            error: code,
            message: self.to_string(),
        });
        let mut response = (status, body).into_response();

        if let ApiError::RateLimited { retry_after_secs } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
