use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::UpstreamSchema;

/// A provider record as received for one distribution method in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProviderRecord {
    pub provider_id: u32,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: Option<f64>,
}

impl RawProviderRecord {
    pub fn new(provider_id: u32, provider_name: impl Into<String>) -> Self {
        Self {
            provider_id,
            provider_name: provider_name.into(),
            logo_path: None,
            display_priority: None,
        }
    }

    pub fn with_logo(mut self, logo_path: impl Into<String>) -> Self {
        self.logo_path = Some(logo_path.into());
        self
    }
}

/// Availability for one region, split by distribution method.
///
/// Missing lists deserialize as empty; `null` lists are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<RawProviderRecord>,
    #[serde(default)]
    pub free: Vec<RawProviderRecord>,
    #[serde(default)]
    pub rent: Vec<RawProviderRecord>,
    #[serde(default)]
    pub buy: Vec<RawProviderRecord>,
}

impl CountryProviders {
    /// Whether any distribution method lists at least one provider,
    /// whitelisted or not.
    pub fn has_any(&self) -> bool {
        !(self.flatrate.is_empty()
            && self.free.is_empty()
            && self.rent.is_empty()
            && self.buy.is_empty())
    }
}

/// `/{media}/{id}/watch/providers` response, keyed by ISO region code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchProviders {
    pub results: BTreeMap<String, CountryProviders>,
}

impl WatchProviders {
    pub fn region(&self, country: &str) -> Option<&CountryProviders> {
        self.results.get(country)
    }

    /// Add or replace one region.
    pub fn with_region(mut self, country: impl Into<String>, entry: CountryProviders) -> Self {
        self.results.insert(country.into(), entry);
        self
    }
}

impl UpstreamSchema for WatchProviders {
    const NAME: &'static str = "watch_providers";
}
