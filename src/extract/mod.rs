//! Address candidate extraction
//!
//! This module runs independent, locale-specific recognition passes over normalized page
//! text and merges their matches into a single candidate set:
//! - Candidates are deduplicated on their canonical string only; `"123 Main St"` and
//!   `"123 Main Street"` stay distinct
//! - A candidate that does not decompose into a complete [`StructuredAddress`] is kept
//!   as a raw candidate but never reaches validation

mod patterns;
mod structured;

pub use patterns::{collapse_whitespace, Locale, RegexPattern};
pub use structured::{decompose, StructuredAddress};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A raw address string tagged with the pass that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub text: String,
    pub locale: Locale,

    /// Fields captured from the match, when they form a complete address
    #[serde(default)]
    pub address: Option<StructuredAddress>,
}

/// Ordered, string-deduplicated set of candidates
///
/// The first pass to produce a given string keeps its locale tag.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<AddressCandidate>,
    seen: HashSet<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a candidate; returns false if its text was already present
    pub fn insert(&mut self, candidate: AddressCandidate) -> bool {
        if self.seen.insert(candidate.text.clone()) {
            self.candidates.push(candidate);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AddressCandidate> {
        self.candidates.iter()
    }

    /// Candidate strings, as stored in a domain result
    pub fn texts(&self) -> BTreeSet<String> {
        self.candidates.iter().map(|c| c.text.clone()).collect()
    }

    /// Complete structured addresses, deduplicated on the full field tuple
    pub fn structured(&self) -> BTreeSet<StructuredAddress> {
        self.candidates
            .iter()
            .filter_map(|c| c.address.clone())
            .collect()
    }
}

/// Runs a fixed list of recognition passes
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: Vec<RegexPattern>,
}

impl Default for Extractor {
    /// US pass first, then GB
    fn default() -> Self {
        Self::with_patterns(Locale::all().into_iter().map(RegexPattern::builtin).collect())
    }
}

impl Extractor {
    pub fn with_patterns(patterns: Vec<RegexPattern>) -> Self {
        Self { patterns }
    }

    /// Extracts candidates from normalized text
    ///
    /// Returns `None` for `None` input and also when every pass came back empty, so a
    /// caller can tell "found none" apart from a non-empty set.
    pub fn extract(&self, clean_text: Option<&str>) -> Option<CandidateSet> {
        let text = clean_text?;
        let mut set = CandidateSet::new();

        for pattern in &self.patterns {
            let matches = pattern.find_candidates(text);
            tracing::trace!("{} pass produced {} matches", pattern.locale, matches.len());

            for candidate in matches {
                if !set.insert(candidate) {
                    tracing::trace!("Duplicate candidate collapsed");
                }
            }
        }

        if set.is_empty() {
            None
        } else {
            Some(set)
        }
    }
}

/// Extracts candidates with the default US + GB passes
///
/// # Examples
///
/// ```
/// use address_scout::extract;
///
/// assert!(extract(None).is_none());
/// assert!(extract(Some("no addresses here")).is_none());
///
/// let set = extract(Some("Visit 123 Main St, Springfield, IL 62704")).unwrap();
/// assert_eq!(set.len(), 1);
/// ```
pub fn extract(clean_text: Option<&str>) -> Option<CandidateSet> {
    Extractor::default().extract(clean_text)
}
