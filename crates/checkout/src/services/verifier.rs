//! Address-verification API client.
//!
//! Calls the third-party address-correction service with a normalized
//! address payload and maps the first match candidate into the
//! provider-neutral [`VerifiedMatch`] shape. Every failure mode (transport,
//! non-OK status, malformed body, no match) is an error - the caller treats
//! those as "validation indeterminate", never as a verified or rejected
//! address.

use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use driftwood_core::{AddressCandidate, VerifiedMatch};

use crate::config::VerifierConfig;

/// Request timeout for verification calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a verification result may be served from cache.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached verification results.
const CACHE_CAPACITY: u64 = 10_000;

/// Errors that can occur when calling the verification service.
#[derive(Debug, Error)]
pub enum VerifierError {
    /// HTTP request failed (connect error, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service answered but reported a non-OK application status.
    #[error("service status: {0}")]
    ServiceStatus(String),

    /// Failed to parse the response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service returned no match candidates at all.
    #[error("no match candidates returned")]
    NoMatch,
}

/// Client for the address-verification service.
///
/// Stateless per call; a small in-process cache fronts the service so
/// repeated submissions of the same address within a session do not re-hit
/// the provider.
#[derive(Clone)]
pub struct VerifierClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    cache: Cache<String, VerifiedMatch>,
}

impl VerifierClient {
    /// Create a new verification client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            cache,
        })
    }

    /// Verify an address candidate against the service.
    ///
    /// Returns the first match candidate. Only successful results are
    /// cached; errors always reach the caller.
    ///
    /// # Errors
    ///
    /// Returns [`VerifierError`] on transport failure, a non-success HTTP
    /// status, a non-OK service status, a malformed body, or an empty match
    /// list.
    pub async fn verify(&self, candidate: &AddressCandidate) -> Result<VerifiedMatch, VerifierError> {
        let key = cache_key(candidate);
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let matched = self.fetch(candidate).await?;
        self.cache.insert(key, matched.clone()).await;
        Ok(matched)
    }

    async fn fetch(&self, candidate: &AddressCandidate) -> Result<VerifiedMatch, VerifierError> {
        let body = VerifyRequest {
            key: self.api_key.expose_secret(),
            addresses: vec![WireAddress {
                address1: candidate.street_line(),
                locality: &candidate.locality,
                postal_code: &candidate.postal_code,
                country: &candidate.country_code,
            }],
        };

        let response = self.client.post(self.endpoint.clone()).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VerifierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: VerifyResponse = response
            .json()
            .await
            .map_err(|e| VerifierError::Parse(e.to_string()))?;

        first_match(parsed)
    }
}

/// Cache key over the normalized candidate fields.
fn cache_key(candidate: &AddressCandidate) -> String {
    format!(
        "{}|{}|{}|{}",
        candidate.street_line().to_lowercase(),
        candidate.locality.to_lowercase(),
        candidate.postal_code.to_lowercase(),
        candidate.country_code.to_lowercase()
    )
}

/// Extract the first match candidate from a service response.
fn first_match(response: VerifyResponse) -> Result<VerifiedMatch, VerifierError> {
    if response.status != "OK" {
        return Err(VerifierError::ServiceStatus(response.status));
    }

    response
        .object
        .into_iter()
        .flat_map(|result| result.matches)
        .next()
        .map(|m| VerifiedMatch {
            thoroughfare: m.thoroughfare,
            premise: m.premise,
            locality: m.locality,
            postal_code: m.postal_code,
            region_code: m.region_code,
            aqi: m.aqi,
            unmatched: m.unmatched,
        })
        .ok_or(VerifierError::NoMatch)
}

// =============================================================================
// Wire Types
// =============================================================================

/// Verification request payload.
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "Key")]
    key: &'a str,
    #[serde(rename = "Addresses")]
    addresses: Vec<WireAddress<'a>>,
}

/// One address in the request payload.
#[derive(Debug, Serialize)]
struct WireAddress<'a> {
    #[serde(rename = "Address1")]
    address1: String,
    #[serde(rename = "Locality")]
    locality: &'a str,
    #[serde(rename = "PostalCode")]
    postal_code: &'a str,
    #[serde(rename = "Country")]
    country: &'a str,
}

/// Top-level verification response.
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: String,
    #[serde(default)]
    object: Vec<WireResult>,
}

/// One verified address in the response.
#[derive(Debug, Deserialize)]
struct WireResult {
    #[serde(rename = "Matches", default)]
    matches: Vec<WireMatch>,
}

/// One match candidate in the response.
#[derive(Debug, Deserialize)]
struct WireMatch {
    #[serde(rename = "Thoroughfare", default)]
    thoroughfare: String,
    #[serde(rename = "Premise", default)]
    premise: String,
    #[serde(rename = "Locality", default)]
    locality: String,
    #[serde(rename = "PostalCode", default)]
    postal_code: String,
    #[serde(rename = "ISO3166-2", default)]
    region_code: String,
    #[serde(rename = "AQI", default)]
    aqi: String,
    #[serde(rename = "Unmatched", default)]
    unmatched: bool,
}
