//! Error types for the geocode crate.
//!
//! Each variant is classified by [`is_recoverable`](GeocodeError::is_recoverable),
//! which determines whether the resolver falls through to the next tier or
//! surfaces the error to the caller.

use thiserror::Error;

/// Errors that can occur during coordinate/code resolution.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The coordinate is out of range or not finite.
    /// User error - surfaced to the caller before any tier is consulted.
    #[error("Invalid coordinate: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinate {
        /// The rejected latitude
        latitude: f64,
        /// The rejected longitude
        longitude: f64,
    },

    /// The location code cannot be parsed by any codec.
    /// User error - surfaced to the caller once the remote tiers are exhausted.
    #[error("Malformed location code: {0}")]
    MalformedCode(String),

    /// The request to a remote resolver timed out.
    /// Transient - the orchestrator tries the next tier.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A remote resolver failed: transport error, non-2xx status, or a
    /// malformed/unsuccessful payload. Transient - the orchestrator tries
    /// the next tier.
    #[error("Resolver unavailable: {provider} - {message}")]
    ResolverUnavailable {
        /// The provider that failed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// Every tier failed. Cannot happen on a correctly wired resolver
    /// (the grid codec is total for valid input) but is modelable for a
    /// misconfigured deployment.
    #[error("All resolvers failed")]
    AllResolversFailed,
}

impl GeocodeError {
    /// Whether the orchestrator may recover from this error by trying the
    /// next resolver tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use driveline_geocode::errors::GeocodeError;
    ///
    /// let error = GeocodeError::Timeout { provider: "DIGIPIN_API".to_string() };
    /// assert!(error.is_recoverable());
    ///
    /// let error = GeocodeError::MalformedCode("??".to_string());
    /// assert!(!error.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ResolverUnavailable { .. }
        )
    }
}
