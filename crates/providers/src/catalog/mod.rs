//! Curated provider whitelist.
//!
//! The default whitelist ships as `provider_catalog.json`, embedded at compile
//! time and parsed once via `lazy_static`. A replacement catalog can be built
//! from any JSON document of the same shape with [`ProviderCatalog::from_json`].
//!
//! Matching normalizes upstream names (lowercase, trim, `+` -> `plus`, strip
//! everything that is not `[a-z0-9]`) and compares them against the
//! normalized aliases of each entry, in declared order.

mod provider_key;

pub use provider_key::{ProviderKey, ProviderKeyed};

use std::collections::HashSet;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::errors::ProvidersError;

/// One whitelisted provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Canonical key, unique within a catalog.
    pub key: ProviderKey,
    /// Name shown to users.
    pub display_name: String,
    /// Sort position; lower sorts first.
    pub order: u32,
    /// Upstream provider ids that map onto this entry.
    #[serde(default)]
    pub match_ids: Vec<u32>,
    /// Human-readable aliases, normalized at match time.
    #[serde(default)]
    pub match_names: Vec<String>,
}

impl ProviderConfig {
    fn matches_name(&self, normalized: &str) -> bool {
        self.match_names
            .iter()
            .any(|alias| normalize_provider_name(alias) == normalized)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    providers: Vec<ProviderConfig>,
}

lazy_static! {
    static ref WHITELIST: ProviderCatalog = ProviderCatalog::from_json(include_str!("provider_catalog.json"))
        .expect("provider_catalog.json must be valid");
}

/// Immutable, ordered set of whitelisted providers.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    entries: Vec<ProviderConfig>,
}

impl ProviderCatalog {
    /// The built-in whitelist.
    pub fn whitelist() -> &'static ProviderCatalog {
        &WHITELIST
    }

    /// Parse a catalog from a JSON document `{ "providers": [ ... ] }`.
    pub fn from_json(json: &str) -> Result<Self, ProvidersError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        let document: CatalogDocument = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| ProvidersError::Catalog(format!("{}: {}", e.path(), e.inner())))?;
        Self::from_entries(document.providers)
    }

    /// Build a catalog from entries, keeping their declared order.
    ///
    /// Rejects duplicate keys, blank display names, and entries that could
    /// never match anything.
    pub fn from_entries(entries: Vec<ProviderConfig>) -> Result<Self, ProvidersError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.key) {
                return Err(ProvidersError::Catalog(format!(
                    "duplicate provider key '{}'",
                    entry.key
                )));
            }
            if entry.display_name.trim().is_empty() {
                return Err(ProvidersError::Catalog(format!(
                    "provider '{}' has an empty display name",
                    entry.key
                )));
            }
            let has_name_matcher = entry
                .match_names
                .iter()
                .any(|alias| !normalize_provider_name(alias).is_empty());
            if entry.match_ids.is_empty() && !has_name_matcher {
                return Err(ProvidersError::Catalog(format!(
                    "provider '{}' has no match ids or names",
                    entry.key
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Entries in declared order.
    pub fn entries(&self) -> &[ProviderConfig] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: ProviderKey) -> Option<&ProviderConfig> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Sort position of `key`, or `None` when the catalog does not list it.
    pub fn order_of(&self, key: ProviderKey) -> Option<u32> {
        self.get(key).map(|entry| entry.order)
    }

    /// Find the whitelist entry for an upstream provider.
    ///
    /// Ids are tried first across all entries; names only when no id matched.
    /// The first entry in declared order wins.
    pub fn match_provider(
        &self,
        external_id: Option<u32>,
        external_name: &str,
    ) -> Option<&ProviderConfig> {
        if let Some(id) = external_id {
            if let Some(entry) = self.entries.iter().find(|e| e.match_ids.contains(&id)) {
                return Some(entry);
            }
        }

        let normalized = normalize_provider_name(external_name);
        if normalized.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.matches_name(&normalized))
    }

    /// Stable sort by catalog order. Keys missing from the catalog go last,
    /// keeping their relative order.
    pub fn sort_providers<T: ProviderKeyed>(&self, mut items: Vec<T>) -> Vec<T> {
        items.sort_by_key(|item| {
            self.order_of(item.provider_key())
                .map_or(u64::MAX, u64::from)
        });
        items
    }
}

/// Normalize a provider name for alias comparison.
///
/// `"Apple TV+"` and `"apple tv plus"` both become `"appletvplus"`.
pub fn normalize_provider_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace('+', "plus")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
