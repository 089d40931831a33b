//! Provider normalization.
//!
//! Turns raw per-region upstream lists into [`RegionProviders`]:
//! whitelist matching, dedup by canonical key (first occurrence wins),
//! catalog ordering, and the primary/paid tier split.

use std::collections::HashSet;
use std::sync::Arc;

use log::trace;

use crate::catalog::{ProviderCatalog, ProviderKey};
use crate::images::logo_url;
use crate::models::{PaidProviders, ProviderView, RegionProviders, RegionResolution};
use crate::schema::{CountryProviders, RawProviderRecord, WatchProviders};

/// Message attached to the primary region when upstream has no entry for it.
pub const DEFAULT_MISSING_PRIMARY_MESSAGE: &str = "한국(KR) 제공처 데이터가 없습니다.";

/// Which regions to report and how to label a missing primary region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionPolicy {
    /// Region that is always reported.
    pub primary_region: String,
    /// Region reported only when the primary region is missing upstream.
    pub fallback_region: String,
    /// Localized message for a missing primary region.
    pub missing_primary_message: String,
}

impl Default for RegionPolicy {
    fn default() -> Self {
        Self {
            primary_region: "KR".to_string(),
            fallback_region: "US".to_string(),
            missing_primary_message: DEFAULT_MISSING_PRIMARY_MESSAGE.to_string(),
        }
    }
}

/// Stateless normalizer over an immutable catalog.
#[derive(Clone, Debug)]
pub struct ProviderNormalizer {
    catalog: Arc<ProviderCatalog>,
    policy: RegionPolicy,
}

impl Default for ProviderNormalizer {
    fn default() -> Self {
        Self::new(
            Arc::new(ProviderCatalog::whitelist().clone()),
            RegionPolicy::default(),
        )
    }
}

impl ProviderNormalizer {
    pub fn new(catalog: Arc<ProviderCatalog>, policy: RegionPolicy) -> Self {
        Self { catalog, policy }
    }

    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RegionPolicy {
        &self.policy
    }

    /// Match, dedup and sort one raw list.
    ///
    /// Unmatched records are dropped. When two records map onto the same
    /// canonical key, the first one in input order is kept.
    pub fn to_provider_views(
        &self,
        records: &[RawProviderRecord],
        link: Option<&str>,
    ) -> Vec<ProviderView> {
        let mut seen: HashSet<ProviderKey> = HashSet::new();
        let mut views = Vec::new();

        for record in records {
            let Some(config) = self
                .catalog
                .match_provider(Some(record.provider_id), &record.provider_name)
            else {
                trace!(
                    "Dropping unlisted provider {} ({})",
                    record.provider_name,
                    record.provider_id
                );
                continue;
            };
            if !seen.insert(config.key) {
                continue;
            }
            views.push(ProviderView {
                key: config.key,
                name: config.display_name.clone(),
                logo_url: logo_url(record.logo_path.as_deref()),
                link: link.map(str::to_string),
            });
        }

        self.catalog.sort_providers(views)
    }

    /// Normalize one region.
    ///
    /// A missing entry yields `exists: false` with empty lists; only the
    /// primary region carries a message. Flatrate views take precedence over
    /// free views with the same key. Paid lists are not deduplicated against
    /// the primary tier.
    pub fn build_region_providers(
        &self,
        country: &str,
        entry: Option<&CountryProviders>,
    ) -> RegionProviders {
        let Some(entry) = entry else {
            let message = (country == self.policy.primary_region)
                .then(|| self.policy.missing_primary_message.clone());
            return RegionProviders::missing(country, message);
        };

        let link = entry.link.as_deref();
        let flatrate = self.to_provider_views(&entry.flatrate, link);
        let free = self.to_provider_views(&entry.free, link);
        let rent = self.to_provider_views(&entry.rent, link);
        let buy = self.to_provider_views(&entry.buy, link);

        let primary = self
            .catalog
            .sort_providers(dedup_by_key(flatrate.into_iter().chain(free)));

        RegionProviders::available(country, primary, PaidProviders { rent, buy })
    }

    /// Apply the region policy to a full upstream response.
    ///
    /// The primary region is always built. The fallback region is built only
    /// when the primary region is absent upstream and the fallback is present;
    /// a primary region with no whitelisted providers does not trigger it.
    pub fn resolve_regions(&self, providers: &WatchProviders) -> RegionResolution {
        let primary_entry = providers.region(&self.policy.primary_region);
        let fallback_entry = providers.region(&self.policy.fallback_region);

        let primary = self.build_region_providers(&self.policy.primary_region, primary_entry);
        let fallback = match (primary_entry, fallback_entry) {
            (None, Some(entry)) => {
                Some(self.build_region_providers(&self.policy.fallback_region, Some(entry)))
            }
            _ => None,
        };

        RegionResolution { primary, fallback }
    }
}

fn dedup_by_key(views: impl IntoIterator<Item = ProviderView>) -> Vec<ProviderView> {
    let mut seen = HashSet::new();
    views
        .into_iter()
        .filter(|view| seen.insert(view.key))
        .collect()
}
