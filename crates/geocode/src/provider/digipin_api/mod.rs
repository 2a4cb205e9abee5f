//! Authoritative DIGIPIN API provider.
//!
//! Delegates encode/decode to the official DIGIPIN endpoint. The service
//! returns coordinates as decimal strings, so both decode fields are parsed
//! here. An API key is optional and is appended as a query parameter when
//! configured.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::GeocodeError;
use crate::models::{Coordinate, LocationCode, ResolutionSource};
use crate::provider::CodeProvider;

pub const DEFAULT_BASE_URL: &str = "https://digipin.indiapost.gov.in";
const PROVIDER_ID: &str = "DIGIPIN_API";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Authoritative remote resolver backed by the DIGIPIN API.
pub struct DigipinApiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================================================
// Response structures for the DIGIPIN API
// ============================================================================

#[derive(Debug, Deserialize)]
struct EncodeResponse {
    digipin: Option<String>,
    error: Option<String>,
}

/// Decode response; the API returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct DecodeResponse {
    latitude: Option<String>,
    longitude: Option<String>,
    error: Option<String>,
}

impl DecodeResponse {
    fn parse_axis(value: &Option<String>) -> Option<f64> {
        value.as_ref().and_then(|s| s.trim().parse::<f64>().ok())
    }
}

// ============================================================================
// DigipinApiProvider implementation
// ============================================================================

impl DigipinApiProvider {
    /// Create a provider against the default endpoint with no credential.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_BASE_URL.to_string(), None, DEFAULT_TIMEOUT)
    }

    /// Create a provider with explicit endpoint, credential, and timeout.
    pub fn with_config(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Issue a GET against the API and return the raw body.
    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<String, GeocodeError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = &self.api_key {
            all_params.push(("apikey", key));
        }

        let endpoint = format!("{}{}", self.base_url, path);
        let url = reqwest::Url::parse_with_params(&endpoint, &all_params).map_err(|e| {
            GeocodeError::ResolverUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build URL: {}", e),
            }
        })?;

        debug!(
            "DIGIPIN API request: {}",
            match &self.api_key {
                Some(key) => url.as_str().replace(key.as_str(), "***"),
                None => url.as_str().to_string(),
            }
        );

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

impl Default for DigipinApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeProvider for DigipinApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        5
    }

    fn source(&self) -> ResolutionSource {
        ResolutionSource::Authoritative
    }

    async fn encode(&self, coordinate: &Coordinate) -> Result<LocationCode, GeocodeError> {
        let latitude = coordinate.latitude.to_string();
        let longitude = coordinate.longitude.to_string();
        let body = self
            .fetch(
                "/api/digipin/encode",
                &[("latitude", &latitude), ("longitude", &longitude)],
            )
            .await?;

        let parsed: EncodeResponse = serde_json::from_str(&body)
            .map_err(|e| Self::payload_error(format!("Malformed encode payload: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(Self::payload_error(error));
        }

        parsed
            .digipin
            .filter(|code| !code.is_empty())
            .ok_or_else(|| Self::payload_error("Encode payload missing digipin"))
    }

    async fn decode(&self, code: &str) -> Result<Coordinate, GeocodeError> {
        let body = self
            .fetch("/api/digipin/decode", &[("digipin", code)])
            .await?;

        let parsed: DecodeResponse = serde_json::from_str(&body)
            .map_err(|e| Self::payload_error(format!("Malformed decode payload: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(Self::payload_error(error));
        }

        let latitude = DecodeResponse::parse_axis(&parsed.latitude)
            .ok_or_else(|| Self::payload_error("Decode payload missing latitude"))?;
        let longitude = DecodeResponse::parse_axis(&parsed.longitude)
            .ok_or_else(|| Self::payload_error("Decode payload missing longitude"))?;

        // An out-of-range payload is a provider fault, not a user error.
        Coordinate::new(latitude, longitude)
            .map_err(|_| Self::payload_error("Decode payload out of range"))
    }
}
