//! Environment-backed resolver configuration.
//!
//! Every knob has a sane default, so a fully unset environment still
//! yields a working resolver (degrading to fallback-only operation when
//! the default endpoints are unreachable).

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheConfig, ResponseCache};
use crate::provider::{community, digipin_api, CodeProvider};
use crate::provider::{CommunityPinProvider, DigipinApiProvider};
use crate::resolver::CodeResolver;

const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_CACHE_CAPACITY: usize = 4096;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 12;

/// Resolver configuration, normally read from the environment.
#[derive(Clone, Debug)]
pub struct ResolverSettings {
    /// Base URL of the authoritative DIGIPIN API.
    pub authoritative_base_url: String,
    /// Optional API credential for the authoritative service.
    pub authoritative_api_key: Option<String>,
    /// Base URL of the community mirror.
    pub peer_base_url: String,
    /// Cache entry time-to-live.
    pub cache_ttl: Duration,
    /// Cache capacity bound.
    pub cache_capacity: usize,
    /// Per-request timeout for remote resolvers.
    pub request_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            authoritative_base_url: digipin_api::DEFAULT_BASE_URL.to_string(),
            authoritative_api_key: None,
            peer_base_url: community::DEFAULT_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ResolverSettings {
    /// Read settings from the environment, falling back to defaults for
    /// anything unset or unparsable.
    ///
    /// Recognized variables: `DIGIPIN_API_URL`, `DIGIPIN_API_KEY`,
    /// `DIGIPIN_PEER_URL`, `GEOCODE_CACHE_TTL_SECS`,
    /// `GEOCODE_CACHE_CAPACITY`, `GEOCODE_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            authoritative_base_url: std::env::var("DIGIPIN_API_URL")
                .unwrap_or(defaults.authoritative_base_url),
            authoritative_api_key: std::env::var("DIGIPIN_API_KEY").ok().filter(|k| !k.is_empty()),
            peer_base_url: std::env::var("DIGIPIN_PEER_URL").unwrap_or(defaults.peer_base_url),
            cache_ttl: env_secs("GEOCODE_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_capacity: std::env::var("GEOCODE_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            request_timeout: env_secs("GEOCODE_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

impl CodeResolver {
    /// Wire a full resolver (both remote tiers + cache) from settings.
    pub fn from_settings(settings: &ResolverSettings) -> Self {
        let providers: Vec<Arc<dyn CodeProvider>> = vec![
            Arc::new(DigipinApiProvider::with_config(
                settings.authoritative_base_url.clone(),
                settings.authoritative_api_key.clone(),
                settings.request_timeout,
            )),
            Arc::new(CommunityPinProvider::with_config(
                settings.peer_base_url.clone(),
                settings.request_timeout,
            )),
        ];
        let cache = Arc::new(ResponseCache::with_config(CacheConfig {
            ttl: settings.cache_ttl,
            capacity: settings.cache_capacity,
        }));
        Self::new(providers, cache)
    }
}

fn env_secs(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
