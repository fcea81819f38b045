//! Address validation against a geocoding service
//!
//! # Components
//!
//! - `Geocoder`: async lookup trait, with a Nominatim HTTP implementation
//! - `Validator`: timeout-bounded, soft-failing wrapper used by the pipeline
//! - `ValidatedAddress`: a structured address the service resolved

mod geocoder;
mod validator;

pub use geocoder::{GeocodeError, GeocodeHit, Geocoder, NominatimGeocoder};
pub use validator::Validator;

use crate::extract::StructuredAddress;
use serde::{Deserialize, Serialize};

/// A structured address plus the geocoder's resolution of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedAddress {
    #[serde(flatten)]
    pub address: StructuredAddress,
    pub latitude: f64,
    pub longitude: f64,
    pub canonical_text: String,
}
