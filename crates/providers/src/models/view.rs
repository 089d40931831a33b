use serde::{Deserialize, Serialize};

use crate::catalog::{ProviderKey, ProviderKeyed};

/// A whitelisted provider, ready for display.
///
/// Within any single list there is at most one view per [`ProviderKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub key: ProviderKey,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ProviderKeyed for ProviderView {
    fn provider_key(&self) -> ProviderKey {
        self.key
    }
}

/// Rental and purchase offers, kept as separate lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidProviders {
    pub rent: Vec<ProviderView>,
    pub buy: Vec<ProviderView>,
}

impl PaidProviders {
    pub fn is_empty(&self) -> bool {
        self.rent.is_empty() && self.buy.is_empty()
    }
}

/// Normalized availability for one region.
///
/// `show_paid` is always `primary_providers.is_empty()` for regions that
/// exist, and `false` for regions that do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionProviders {
    pub country: String,
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub primary_providers: Vec<ProviderView>,
    pub paid_providers: PaidProviders,
    pub show_paid: bool,
}

impl RegionProviders {
    /// A region the upstream data does not mention.
    pub fn missing(country: impl Into<String>, message: Option<String>) -> Self {
        Self {
            country: country.into(),
            exists: false,
            message,
            primary_providers: Vec::new(),
            paid_providers: PaidProviders::default(),
            show_paid: false,
        }
    }

    /// A region that exists, with `show_paid` derived from the primary tier.
    pub fn available(
        country: impl Into<String>,
        primary_providers: Vec<ProviderView>,
        paid_providers: PaidProviders,
    ) -> Self {
        let show_paid = primary_providers.is_empty();
        Self {
            country: country.into(),
            exists: true,
            message: None,
            primary_providers,
            paid_providers,
            show_paid,
        }
    }
}

/// Primary region plus the optional fallback region.
///
/// `fallback` is only present when the primary region is missing upstream
/// and the fallback region exists. The primary region is sent as `kr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionResolution {
    #[serde(rename = "kr")]
    pub primary: RegionProviders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<RegionProviders>,
}
