//! Per-domain result records
//!
//! `DomainResult` is what the pipeline produces for each domain and what the log stores.
//! `OutputRecord` is the four-column row shape handed to spreadsheet-style consumers.

use crate::state::DomainStatus;
use crate::validate::ValidatedAddress;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Sentinel written when a domain has no validated address
pub const NOT_VALIDATED: &str = "Not validated";

/// The outcome of processing one domain
///
/// Created once, appended to the log, never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainResult {
    /// Index of the domain in the input list
    pub position: usize,
    pub domain: String,
    /// Seed URL the crawl started from
    pub url: String,
    pub status: DomainStatus,
    /// Raw candidate strings, deduplicated on the exact text
    pub address_candidates: BTreeSet<String>,
    pub validated_addresses: Vec<ValidatedAddress>,
    /// The crawl stopped early because of a page or time budget
    pub truncated: bool,
}

impl DomainResult {
    pub fn new(
        position: usize,
        domain: impl Into<String>,
        url: impl Into<String>,
        status: DomainStatus,
    ) -> Self {
        Self {
            position,
            domain: domain.into(),
            url: url.into(),
            status,
            address_candidates: BTreeSet::new(),
            validated_addresses: Vec::new(),
            truncated: false,
        }
    }

    /// Returns true if at least one address was validated
    pub fn is_validated(&self) -> bool {
        !self.validated_addresses.is_empty()
    }

    /// Renders the result as an output row
    pub fn to_record(&self) -> OutputRecord {
        let validated = if self.is_validated() {
            ValidationCell::Validated(self.validated_addresses.clone())
        } else {
            ValidationCell::NotValidated
        };

        OutputRecord {
            domain: self.domain.clone(),
            url: hyperlink_formula(&self.url),
            status: self.status,
            validated,
        }
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Domain")]
    pub domain: String,

    /// A clickable spreadsheet formula
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Status")]
    pub status: DomainStatus,

    #[serde(rename = "Validated with GeoPy")]
    pub validated: ValidationCell,
}

/// The `Validated with GeoPy` column: a list of addresses or the sentinel string
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationCell {
    NotValidated,
    Validated(Vec<ValidatedAddress>),
}

impl Serialize for ValidationCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::NotValidated => serializer.serialize_str(NOT_VALIDATED),
            Self::Validated(addresses) => addresses.serialize(serializer),
        }
    }
}

/// Builds `=HYPERLINK("url", "url")`, doubling embedded quotes
pub fn hyperlink_formula(url: &str) -> String {
    let escaped = url.replace('"', "\"\"");
    format!("=HYPERLINK(\"{}\", \"{}\")", escaped, escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StructuredAddress;

    fn validated_address() -> ValidatedAddress {
        ValidatedAddress {
            address: StructuredAddress {
                country: Some("USA".into()),
                region: Some("IL".into()),
                locality: Some("Springfield".into()),
                postcode: Some("62704".into()),
                street: Some("Main St".into()),
                house_number: Some("123".into()),
            },
            latitude: 39.78,
            longitude: -89.65,
            canonical_text: "123 Main St, Springfield".into(),
        }
    }

    #[test]
    fn test_hyperlink_formula() {
        assert_eq!(
            hyperlink_formula("http://example.com"),
            r#"=HYPERLINK("http://example.com", "http://example.com")"#
        );
        assert_eq!(
            hyperlink_formula(r#"http://a.com/"q""#),
            r#"=HYPERLINK("http://a.com/""q""", "http://a.com/""q""")"#
        );
    }

    #[test]
    fn test_unvalidated_record() {
        let mut result =
            DomainResult::new(0, "example.com", "http://example.com", DomainStatus::Reachable);
        result
            .address_candidates
            .insert("123 Main St, Springfield, IL 62704".into());

        let json = serde_json::to_value(result.to_record()).unwrap();
        assert_eq!(json["Domain"], "example.com");
        assert_eq!(json["Status"], "Reachable");
        assert_eq!(json["Validated with GeoPy"], NOT_VALIDATED);
    }

    #[test]
    fn test_validated_record() {
        let mut result =
            DomainResult::new(0, "example.com", "http://example.com", DomainStatus::Reachable);
        result.validated_addresses.push(validated_address());

        let json = serde_json::to_value(result.to_record()).unwrap();
        let cell = json["Validated with GeoPy"].as_array().unwrap();
        assert_eq!(cell.len(), 1);
        assert_eq!(cell[0]["locality"], "Springfield");
        assert_eq!(cell[0]["canonical_text"], "123 Main St, Springfield");
    }

    #[test]
    fn test_no_address_status_label() {
        let result = DomainResult::new(
            3,
            "quiet.com",
            "http://quiet.com",
            DomainStatus::ReachableNoAddress,
        );
        let json = serde_json::to_value(result.to_record()).unwrap();
        assert_eq!(json["Status"], "Reachable - No Addresses");
    }
}
