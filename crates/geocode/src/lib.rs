//! Driveline Geocode Crate
//!
//! Layered coordinate/code resolution for the Driveline booking backend.
//!
//! # Overview
//!
//! Converts geographic coordinates to compact DIGIPIN-style location codes
//! and back, combining:
//! - a remote authoritative resolver (DIGIPIN API)
//! - a remote peer/open-source resolver (community mirror)
//! - a deterministic local grid codec requiring no I/O
//!
//! unified behind a response cache with time-based expiry.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   CodeResolver   |  (tiered orchestrator)
//! +------------------+
//!     |         |
//!     v         v
//! +-------+ +--------------------+
//! | Cache | |   CodeProvider     |  (DIGIPIN API, community mirror)
//! +-------+ +--------------------+
//!               |
//!               v  on exhaustion
//!          +-----------+
//!          | GridCodec |  (total local fallback)
//!          +-----------+
//! ```
//!
//! Every resolution is tagged with its provenance ([`ResolutionSource`])
//! and a confidence score that degrades monotonically down the tier list.
//!
//! # Core Types
//!
//! - [`Coordinate`] - validated geographic position
//! - [`Resolution`] - tagged resolution result (value + source + confidence)
//! - [`CodeResolver`] - the single encode/decode entry point
//! - [`ResolverSettings`] - environment-backed configuration

pub mod cache;
pub mod codec;
pub mod errors;
pub mod models;
pub mod provider;
pub mod resolver;
pub mod settings;

// Re-export all public types from models
pub use models::{Coordinate, LocationCode, Resolution, ResolutionSource, ResolvedValue};

// Re-export codec, cache, and resolver types
pub use cache::{CacheConfig, CacheStats, ResponseCache};
pub use codec::GridCodec;
pub use errors::GeocodeError;
pub use resolver::CodeResolver;
pub use settings::ResolverSettings;

// Re-export provider types
pub use provider::{CodeProvider, CommunityPinProvider, DigipinApiProvider};
