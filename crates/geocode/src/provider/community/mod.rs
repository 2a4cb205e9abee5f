//! Community mirror provider - the peer tier.
//!
//! Same contract as the authoritative provider, different endpoint shape:
//! the community service wraps results in a `status` envelope and returns
//! coordinates as numbers. No credential.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::GeocodeError;
use crate::models::{Coordinate, LocationCode, ResolutionSource};
use crate::provider::CodeProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.opendigipin.org";
const PROVIDER_ID: &str = "COMMUNITY_PIN";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Peer remote resolver backed by the community DIGIPIN mirror.
pub struct CommunityPinProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct EncodeEnvelope {
    status: String,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DecodeEnvelope {
    status: String,
    lat: Option<f64>,
    lng: Option<f64>,
    message: Option<String>,
}

impl CommunityPinProvider {
    /// Create a provider against the default community endpoint.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_BASE_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Create a provider with explicit endpoint and timeout.
    pub fn with_config(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String, GeocodeError> {
        let endpoint = format!("{}{}", self.base_url, path);
        let url = reqwest::Url::parse_with_params(&endpoint, params).map_err(|e| {
            GeocodeError::ResolverUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!("Community pin request: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                GeocodeError::ResolverUnavailable {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::ResolverUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        response
            .text()
            .await
            .map_err(|e| GeocodeError::ResolverUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })
    }

    fn payload_error(message: impl Into<String>) -> GeocodeError {
        GeocodeError::ResolverUnavailable {
            provider: PROVIDER_ID.to_string(),
            message: message.into(),
        }
    }
}

impl Default for CommunityPinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeProvider for CommunityPinProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn source(&self) -> ResolutionSource {
        ResolutionSource::Peer
    }

    async fn encode(&self, coordinate: &Coordinate) -> Result<LocationCode, GeocodeError> {
        let lat = coordinate.latitude.to_string();
        let lng = coordinate.longitude.to_string();
        let body = self
            .fetch("/v1/encode", &[("lat", &lat), ("lng", &lng)])
            .await?;

        let parsed: EncodeEnvelope = serde_json::from_str(&body)
            .map_err(|e| Self::payload_error(format!("Malformed encode payload: {}", e)))?;

        if parsed.status != "ok" {
            return Err(Self::payload_error(
                parsed
                    .message
                    .unwrap_or_else(|| format!("status {}", parsed.status)),
            ));
        }

        parsed
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| Self::payload_error("Encode payload missing code"))
    }

    async fn decode(&self, code: &str) -> Result<Coordinate, GeocodeError> {
        let body = self.fetch("/v1/decode", &[("code", code)]).await?;

        let parsed: DecodeEnvelope = serde_json::from_str(&body)
            .map_err(|e| Self::payload_error(format!("Malformed decode payload: {}", e)))?;

        if parsed.status != "ok" {
            return Err(Self::payload_error(
                parsed
                    .message
                    .unwrap_or_else(|| format!("status {}", parsed.status)),
            ));
        }

        let lat = parsed
            .lat
            .ok_or_else(|| Self::payload_error("Decode payload missing lat"))?;
        let lng = parsed
            .lng
            .ok_or_else(|| Self::payload_error("Decode payload missing lng"))?;

        Coordinate::new(lat, lng).map_err(|_| Self::payload_error("Decode payload out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_envelope_parses() {
        let parsed: EncodeEnvelope =
            serde_json::from_str(r#"{"status": "ok", "code": "907-628-77"}"#).unwrap();
        assert_eq!(parsed.status, "ok");
        assert_eq!(parsed.code.as_deref(), Some("907-628-77"));
    }

    #[test]
    fn test_error_envelope_parses() {
        let parsed: EncodeEnvelope =
            serde_json::from_str(r#"{"status": "error", "message": "rate limited"}"#).unwrap();
        assert_eq!(parsed.status, "error");
        assert_eq!(parsed.message.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_decode_envelope_parses_numeric_axes() {
        let parsed: DecodeEnvelope =
            serde_json::from_str(r#"{"status": "ok", "lat": 19.076, "lng": 72.8777}"#).unwrap();
        assert_eq!(parsed.lat, Some(19.076));
        assert_eq!(parsed.lng, Some(72.8777));
    }
}
