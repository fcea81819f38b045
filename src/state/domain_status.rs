//! Per-domain outcome definitions
//!
//! A domain ends in exactly one of these states once the pipeline is done with it.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final status of one domain in the result log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainStatus {
    /// Seed page fetched and at least one address candidate found
    #[serde(rename = "Reachable")]
    Reachable,

    /// Seed page fetched but no address candidate found
    #[serde(rename = "Reachable - No Addresses")]
    ReachableNoAddress,

    /// Seed page could not be fetched (bad status, TLS or network failure)
    #[serde(rename = "Unreachable")]
    Unreachable,
}

impl DomainStatus {
    /// Returns true if the seed page of the domain was fetched
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable | Self::ReachableNoAddress)
    }

    /// Human-readable label used in the output record's `Status` column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reachable => "Reachable",
            Self::ReachableNoAddress => "Reachable - No Addresses",
            Self::Unreachable => "Unreachable",
        }
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Reachable => "reachable",
            Self::ReachableNoAddress => "reachable_no_address",
            Self::Unreachable => "unreachable",
        }
    }

    /// Parses a status from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "reachable" => Some(Self::Reachable),
            "reachable_no_address" => Some(Self::ReachableNoAddress),
            "unreachable" => Some(Self::Unreachable),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all() -> [Self; 3] {
        [Self::Reachable, Self::ReachableNoAddress, Self::Unreachable]
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
