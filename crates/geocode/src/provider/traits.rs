//! Remote resolver trait definition.

use async_trait::async_trait;

use crate::errors::GeocodeError;
use crate::models::{Coordinate, LocationCode, ResolutionSource};

/// Trait for remote coordinate/code resolvers.
///
/// Implement this trait to add support for a new resolution backend. The
/// orchestrator walks providers in priority order and treats every
/// recoverable failure as "try the next tier", so implementations should
/// map transport and payload problems to [`GeocodeError::ResolverUnavailable`]
/// (or [`GeocodeError::Timeout`]) rather than surfacing them.
///
/// Each call is stateless and idempotent; retries, if any, belong to the
/// caller, not the provider.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "DIGIPIN_API" or "COMMUNITY_PIN".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Provider priority for ordering.
    ///
    /// Lower values = higher priority. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// The provenance tag attached to results from this provider.
    fn source(&self) -> ResolutionSource;

    /// Encode a validated coordinate into a location code.
    async fn encode(&self, coordinate: &Coordinate) -> Result<LocationCode, GeocodeError>;

    /// Decode a location code into a coordinate.
    async fn decode(&self, code: &str) -> Result<Coordinate, GeocodeError>;
}
