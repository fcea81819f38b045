use crate::extract::patterns::{collapse_whitespace, Locale};
use regex::Captures;
use serde::{Deserialize, Serialize};

/// An address decomposed into named fields
///
/// Every field is optional; an address is *complete* only when all of them are present.
/// Equality and ordering are field-wise and exact, so a `BTreeSet<StructuredAddress>`
/// deduplicates on the full tuple and nothing else.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StructuredAddress {
    pub country: Option<String>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub postcode: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
}

impl StructuredAddress {
    /// Returns true when every field is present and non-empty
    pub fn is_complete(&self) -> bool {
        [
            &self.country,
            &self.region,
            &self.locality,
            &self.postcode,
            &self.street,
            &self.house_number,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    /// Formats the geocoding query: number, street, locality, region joined by `", "`
    ///
    /// Missing or empty fields are skipped rather than left as empty segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use address_scout::StructuredAddress;
    ///
    /// let address = StructuredAddress {
    ///     house_number: Some("123".into()),
    ///     street: Some("Main St".into()),
    ///     region: Some("IL".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(address.query_string(), "123, Main St, IL");
    /// ```
    pub fn query_string(&self) -> String {
        [
            &self.house_number,
            &self.street,
            &self.locality,
            &self.region,
        ]
        .iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Splits a standalone address string into a complete structured address
///
/// The text is matched against the locale's pattern and the match must cover all of it.
/// Returns `None` when the text does not decompose or a field is missing.
///
/// Candidates found by [`RegexPattern::find_candidates`](crate::extract::RegexPattern::find_candidates)
/// already carry fields captured against the page text; use those instead of running
/// this on the collapsed candidate string, which has lost its line breaks.
pub fn decompose(text: &str, locale: Locale) -> Option<StructuredAddress> {
    let captures = locale.pattern().captures(text)?;

    let whole = captures.get(0)?;
    if whole.start() != 0 || whole.end() != text.len() {
        tracing::trace!("Text only partially decomposes: {}", text);
        return None;
    }

    from_captures(&captures, locale)
}

/// Builds a complete structured address from one pattern match
pub(crate) fn from_captures(captures: &Captures<'_>, locale: Locale) -> Option<StructuredAddress> {
    let field = |name: &str| {
        captures
            .name(name)
            .map(|m| collapse_whitespace(m.as_str()))
            .filter(|v| !v.is_empty())
    };

    let address = StructuredAddress {
        country: Some(locale.country().to_string()),
        region: field("region"),
        locality: field("locality"),
        postcode: field("postcode").map(|p| p.to_uppercase()),
        street: field("street").map(|s| s.trim_end_matches('.').to_string()),
        house_number: field("number"),
    };

    if address.is_complete() {
        Some(address)
    } else {
        tracing::debug!(
            "Dropping incomplete structured address for '{}'",
            captures.get(0).map_or("", |m| m.as_str())
        );
        None
    }
}
