//! Domain models for coordinate/code resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GeocodeError;

/// A location code - an opaque printable string produced by whichever codec
/// resolved it. Many coordinates may decode to the same code (grid
/// quantization); a given code always decodes to the same point under the
/// same codec.
pub type LocationCode = String;

/// A validated geographic coordinate.
///
/// Construction rejects out-of-range and non-finite values, so every
/// `Coordinate` that reaches a resolver tier is known to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating range and finiteness.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeocodeError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(GeocodeError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Which resolver tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// The authoritative remote resolver.
    Authoritative,
    /// The peer/open-source remote resolver.
    Peer,
    /// The local deterministic grid codec.
    Fallback,
}

impl ResolutionSource {
    /// Heuristic confidence score for this tier.
    ///
    /// Confidence degrades monotonically down the tier list.
    pub fn confidence(&self) -> f64 {
        match self {
            Self::Authoritative => 0.95,
            Self::Peer => 0.90,
            Self::Fallback => 0.50,
        }
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authoritative => write!(f, "authoritative"),
            Self::Peer => write!(f, "peer"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The payload of a resolution: a code (from encode) or a position
/// (from decode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedValue {
    Code(LocationCode),
    Position(Coordinate),
}

/// A tagged resolution result: value + provenance + confidence + timestamp.
///
/// Produced fresh by a resolver tier or replayed from the cache; never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub value: ResolvedValue,
    pub source: ResolutionSource,
    pub confidence: f64,
    pub resolved_at: DateTime<Utc>,
}

impl Resolution {
    /// Build a resolution stamped now, with the tier's own confidence.
    pub fn new(value: ResolvedValue, source: ResolutionSource) -> Self {
        Self {
            value,
            source,
            confidence: source.confidence(),
            resolved_at: Utc::now(),
        }
    }

    /// The code payload, if this resolution came from an encode.
    pub fn as_code(&self) -> Option<&str> {
        match &self.value {
            ResolvedValue::Code(code) => Some(code),
            ResolvedValue::Position(_) => None,
        }
    }

    /// The coordinate payload, if this resolution came from a decode.
    pub fn as_position(&self) -> Option<Coordinate> {
        match self.value {
            ResolvedValue::Position(position) => Some(position),
            ResolvedValue::Code(_) => None,
        }
    }
}
