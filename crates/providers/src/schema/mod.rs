//! Upstream payload schemas.
//!
//! Every upstream response is parsed into a typed struct through [`validate`],
//! which either yields the typed value or a [`ProvidersError::Schema`] naming
//! the schema and the JSON path that failed. Validation failure is a distinct
//! error kind; callers never see a partially parsed payload.

mod content;
mod watch;

pub use content::{MovieRecord, MovieSearchPage, MultiSearchPage, MultiSearchRow, TrendingPage, TrendingRow, TvRecord};
pub use watch::{CountryProviders, RawProviderRecord, WatchProviders};

use serde::de::DeserializeOwned;

use crate::errors::ProvidersError;

/// A typed upstream document.
pub trait UpstreamSchema: DeserializeOwned {
    /// Name used in validation errors.
    const NAME: &'static str;
}

/// Parse and validate an upstream JSON body.
pub fn validate<T: UpstreamSchema>(body: &str) -> Result<T, ProvidersError> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|err| ProvidersError::Schema {
        context: T::NAME,
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
