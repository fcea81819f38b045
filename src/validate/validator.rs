use crate::config::Config;
use crate::extract::StructuredAddress;
use crate::validate::geocoder::{GeocodeError, Geocoder, NominatimGeocoder};
use crate::validate::ValidatedAddress;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Soft-failing front end to a geocoding service
///
/// Every lookup is a single attempt bounded by `timeout`. Timeouts and service errors are
/// logged and reported as `None`; nothing here can fail a domain.
#[derive(Clone)]
pub struct Validator {
    geocoder: Option<Arc<dyn Geocoder>>,
    timeout: Duration,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("geocoder", &self.geocoder.as_ref().map(|g| g.name()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Validator {
    pub fn new(geocoder: Arc<dyn Geocoder>, timeout: Duration) -> Self {
        Self {
            geocoder: Some(geocoder),
            timeout,
        }
    }

    /// A validator that never resolves anything
    pub fn disabled() -> Self {
        Self {
            geocoder: None,
            timeout: Duration::ZERO,
        }
    }

    /// Builds the configured validator (Nominatim, or disabled)
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        if !config.geocoder.enabled {
            return Ok(Self::disabled());
        }

        let geocoder = NominatimGeocoder::new(&config.geocoder, &config.user_agent)?;
        Ok(Self::new(
            Arc::new(geocoder),
            Duration::from_secs(config.geocoder.timeout_seconds),
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Resolves one structured address
    ///
    /// Returns `None` when validation is disabled, the service knows no such address, the
    /// lookup times out, or the service fails.
    pub async fn validate(&self, address: &StructuredAddress) -> Option<ValidatedAddress> {
        let geocoder = self.geocoder.as_ref()?;
        let query = address.query_string();
        if query.is_empty() {
            return None;
        }

        let result = match tokio::time::timeout(self.timeout, geocoder.lookup(&query)).await {
            Ok(result) => result,
            Err(_) => Err(GeocodeError::Timeout),
        };

        match result {
            Ok(Some(hit)) => {
                tracing::debug!("Validated '{}' as '{}'", query, hit.canonical_text);
                Some(ValidatedAddress {
                    address: address.clone(),
                    latitude: hit.latitude,
                    longitude: hit.longitude,
                    canonical_text: hit.canonical_text,
                })
            }
            Ok(None) => {
                tracing::debug!("No {} match for '{}'", geocoder.name(), query);
                None
            }
            Err(e) => {
                tracing::warn!("Could not validate '{}' with {}: {}", query, geocoder.name(), e);
                None
            }
        }
    }

    /// Resolves each address in turn, keeping the ones that validated
    pub async fn validate_all(
        &self,
        addresses: &BTreeSet<StructuredAddress>,
    ) -> Vec<ValidatedAddress> {
        let mut validated = Vec::new();
        if !self.is_enabled() {
            return validated;
        }

        for address in addresses {
            if let Some(hit) = self.validate(address).await {
                validated.push(hit);
            }
        }
        validated
    }
}
