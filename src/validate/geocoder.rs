//! Geocoding services
//!
//! A [`Geocoder`] turns a free-form address query into a single best hit. The only
//! production implementation talks to a Nominatim-compatible HTTP API.

use crate::config::{GeocoderConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors a geocoding service can report
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding service answered HTTP {0}")]
    Status(u16),

    #[error("Malformed geocoding response: {0}")]
    Malformed(String),

    #[error("Geocoding lookup timed out")]
    Timeout,
}

/// The best match for an address query
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
    /// The service's own rendering of the address
    pub canonical_text: String,
}

/// A single-lookup geocoding service
///
/// `Ok(None)` means the service answered but knows no such address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

/// Nominatim `/search` client
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

/// One element of the `/search?format=json` array
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimGeocoder {
    /// Builds a client identified with the crawler's own user agent
    pub fn new(
        config: &GeocoderConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent.header_value())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_client(client, &config.endpoint))
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            search_url: format!("{}/search", endpoint.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("latitude '{}'", place.lat)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("longitude '{}'", place.lon)))?;

        Ok(Some(GeocodeHit {
            latitude,
            longitude,
            canonical_text: place.display_name,
        }))
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}
