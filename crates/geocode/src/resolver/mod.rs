//! Tiered resolution orchestrator.
//!
//! Single entry point for coordinate/code resolution. The resolver
//! consults the cache, then walks the remote providers in priority order,
//! and on exhaustion uses the local grid codec. The walk is strictly
//! short-circuiting: once a tier succeeds, lower-priority tiers are not
//! attempted, so the most authoritative available source always wins and
//! confidence degrades monotonically down the list.
//!
//! Recoverable provider failures (timeouts, transport errors, bad
//! payloads) are logged and converted into "try the next tier"; they never
//! surface to the caller. The only user-visible failures are invalid
//! coordinates and codes the fallback codec itself cannot parse.

use std::sync::Arc;

use log::{debug, warn};

use crate::cache::{CacheStats, ResponseCache};
use crate::codec::GridCodec;
use crate::errors::GeocodeError;
use crate::models::{Coordinate, Resolution, ResolutionSource, ResolvedValue};
use crate::provider::CodeProvider;

/// Tiered coordinate/code resolver.
///
/// Owns its cache explicitly (no process-wide state): tests and callers
/// construct isolated instances.
pub struct CodeResolver {
    providers: Vec<Arc<dyn CodeProvider>>,
    cache: Arc<ResponseCache>,
}

impl CodeResolver {
    /// Create a resolver over the given providers and cache.
    ///
    /// Providers are ordered by `priority()` (lower first). An empty
    /// provider list yields fallback-only operation.
    pub fn new(providers: Vec<Arc<dyn CodeProvider>>, cache: Arc<ResponseCache>) -> Self {
        let mut providers = providers;
        providers.sort_by_key(|p| p.priority());
        Self { providers, cache }
    }

    /// Encode a coordinate into a location code.
    ///
    /// Fails fast with [`GeocodeError::InvalidCoordinate`] before any tier
    /// is consulted; otherwise always succeeds (the grid codec is total
    /// for valid input).
    pub async fn encode(&self, latitude: f64, longitude: f64) -> Result<Resolution, GeocodeError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        let key = Self::coordinate_key(&coordinate);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Encode cache hit for {}", coordinate);
            return Ok(cached);
        }

        for provider in &self.providers {
            match provider.encode(&coordinate).await {
                Ok(code) => {
                    debug!("Encoded {} via '{}'", coordinate, provider.id());
                    let resolution = Resolution::new(ResolvedValue::Code(code), provider.source());
                    self.cache.put(&key, resolution.clone());
                    return Ok(resolution);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(
                        "Provider '{}' failed to encode {}: {}, trying next tier",
                        provider.id(),
                        coordinate,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let resolution = Resolution::new(
            ResolvedValue::Code(GridCodec::encode(&coordinate)),
            ResolutionSource::Fallback,
        );
        self.cache.put(&key, resolution.clone());
        Ok(resolution)
    }

    /// Decode a location code into a coordinate.
    ///
    /// Fails with [`GeocodeError::MalformedCode`] only when the fallback
    /// codec itself cannot parse the code, the remote tiers having already
    /// been exhausted.
    pub async fn decode(&self, code: &str) -> Result<Resolution, GeocodeError> {
        let key = Self::code_key(code);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Decode cache hit for '{}'", code);
            return Ok(cached);
        }

        for provider in &self.providers {
            match provider.decode(code).await {
                Ok(position) => {
                    debug!("Decoded '{}' via '{}'", code, provider.id());
                    let resolution =
                        Resolution::new(ResolvedValue::Position(position), provider.source());
                    self.cache.put(&key, resolution.clone());
                    return Ok(resolution);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(
                        "Provider '{}' failed to decode '{}': {}, trying next tier",
                        provider.id(),
                        code,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let position = GridCodec::decode(code)?;
        let resolution = Resolution::new(
            ResolvedValue::Position(position),
            ResolutionSource::Fallback,
        );
        self.cache.put(&key, resolution.clone());
        Ok(resolution)
    }

    /// Snapshot of the cache counters, for observability.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The registered providers, in walk order.
    pub fn providers(&self) -> &[Arc<dyn CodeProvider>] {
        &self.providers
    }

    /// Coordinate keys quantize both axes to 6 decimal places so
    /// near-identical floating inputs hit the same entry.
    fn coordinate_key(coordinate: &Coordinate) -> String {
        format!(
            "enc:{:.6}:{:.6}",
            coordinate.latitude, coordinate.longitude
        )
    }

    /// Code keys use the code string verbatim.
    fn code_key(code: &str) -> String {
        format!("dec:{}", code)
    }
}
