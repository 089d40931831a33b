use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical identifier of a whitelisted streaming provider.
///
/// The set is closed: upstream providers that do not map onto one of these
/// keys are dropped during normalization. Serialized as the lowercase key
/// string (`"netflix"`, `"appletvplus"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKey {
    Netflix,
    Disney,
    Tving,
    CoupangPlay,
    Wavve,
    Watcha,
    AppleTvPlus,
}

impl ProviderKey {
    pub const ALL: [ProviderKey; 7] = [
        Self::Netflix,
        Self::Disney,
        Self::Tving,
        Self::CoupangPlay,
        Self::Wavve,
        Self::Watcha,
        Self::AppleTvPlus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Netflix => "netflix",
            Self::Disney => "disney",
            Self::Tving => "tving",
            Self::CoupangPlay => "coupangplay",
            Self::Wavve => "wavve",
            Self::Watcha => "watcha",
            Self::AppleTvPlus => "appletvplus",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown provider key '{}'", s))
    }
}

/// Anything that carries a canonical provider key and can therefore be
/// ordered by the catalog.
pub trait ProviderKeyed {
    fn provider_key(&self) -> ProviderKey;
}

impl ProviderKeyed for ProviderKey {
    fn provider_key(&self) -> ProviderKey {
        *self
    }
}
