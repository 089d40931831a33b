//! Error types for the providers crate.
//!
//! - [`ProvidersError`]: the main error enum for lookup, validation and catalog loading
//! - [`ErrorKind`]: classification used by callers to pick a response

mod kind;

pub use kind::ErrorKind;

use thiserror::Error;

/// Errors that can occur while resolving content and provider availability.
///
/// Unmatched providers and missing regions are not errors; they are absorbed
/// by the normalizer. Everything here is surfaced to the caller.
#[derive(Error, Debug)]
pub enum ProvidersError {
    /// The upstream payload failed structural validation.
    #[error("Schema validation failed for {context} at {path}: {message}")]
    Schema {
        /// Name of the schema that was being validated
        context: &'static str,
        /// JSON path of the offending value (`.` for the document root)
        path: String,
        /// Description of the mismatch
        message: String,
    },

    /// The provider catalog configuration is invalid.
    #[error("Invalid provider catalog: {0}")]
    Catalog(String),

    /// No upstream API key is configured.
    #[error("TMDB API key is missing")]
    MissingApiKey,

    /// Upstream answered with a non-success status.
    #[error("TMDB error: {status} {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The upstream request timed out.
    #[error("TMDB request timed out")]
    Timeout,

    /// Upstream rate limited the request (HTTP 429).
    #[error("TMDB rate limited the request")]
    RateLimited,

    /// The request could not be sent or the body could not be read.
    #[error("TMDB request failed: {0}")]
    Request(String),

    /// The caller supplied an invalid request.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing matched the request.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ProvidersError {
    /// Returns the classification for this error.
    ///
    /// ```
    /// use watchfinder_providers::errors::{ErrorKind, ProvidersError};
    ///
    /// let error = ProvidersError::Timeout;
    /// assert_eq!(error.kind(), ErrorKind::Upstream);
    ///
    /// let error = ProvidersError::NotFound("parasite".to_string());
    /// assert_eq!(error.kind(), ErrorKind::NotFound);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } => ErrorKind::Validation,

            Self::Upstream { .. } | Self::Timeout | Self::RateLimited | Self::Request(_) => {
                ErrorKind::Upstream
            }

            Self::Catalog(_) | Self::MissingApiKey => ErrorKind::Configuration,

            Self::InvalidInput(_) => ErrorKind::Input,

            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl From<reqwest::Error> for ProvidersError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.to_string())
        }
    }
}
