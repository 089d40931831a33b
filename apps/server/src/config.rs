use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// TMDB v3 API key. `None` when unset or blank.
    pub tmdb_api_key: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    /// Replacement provider catalog (JSON); the built-in whitelist when `None`.
    pub catalog_path: Option<String>,
    pub primary_region: String,
    pub fallback_region: String,
    pub language: String,
    pub fallback_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            tmdb_api_key: None,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            cache_ttl: Duration::from_secs(600),
            catalog_path: None,
            primary_region: "KR".to_string(),
            fallback_region: "US".to_string(),
            language: "ko-KR".to_string(),
            fallback_language: "en-US".to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_listen_addr(raw: Option<String>) -> anyhow::Result<SocketAddr> {
    let raw = raw.unwrap_or_else(|| "0.0.0.0:8080".to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid WATCHFINDER_LISTEN_ADDR {:?}", raw))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = parse_listen_addr(std::env::var("WATCHFINDER_LISTEN_ADDR").ok())?;
        let cors_allow = std::env::var("WATCHFINDER_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("WATCHFINDER_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let cache_ttl_secs: u64 = std::env::var("WATCHFINDER_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .unwrap_or(600);

        Ok(Self {
            listen_addr,
            tmdb_api_key: non_empty_var("TMDB_API_KEY"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            catalog_path: non_empty_var("WATCHFINDER_CATALOG_PATH"),
            primary_region: non_empty_var("WATCHFINDER_PRIMARY_REGION")
                .unwrap_or(defaults.primary_region),
            fallback_region: non_empty_var("WATCHFINDER_FALLBACK_REGION")
                .unwrap_or(defaults.fallback_region),
            language: non_empty_var("WATCHFINDER_LANGUAGE").unwrap_or(defaults.language),
            fallback_language: non_empty_var("WATCHFINDER_FALLBACK_LANGUAGE")
                .unwrap_or(defaults.fallback_language),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listen_addr() {
        assert_eq!(
            parse_listen_addr(None).unwrap(),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
        assert_eq!(
            parse_listen_addr(Some(" 127.0.0.1:3000 ".to_string())).unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 3000))
        );
    }

    #[test]
    fn test_invalid_listen_addr_is_an_error() {
        let err = parse_listen_addr(Some("localhost".to_string())).unwrap_err();
        assert!(err.to_string().contains("WATCHFINDER_LISTEN_ADDR"));
    }
}
