//! Locale-specific address recognition patterns
//!
//! Each pattern is a verbose regex with named groups `number`, `street`, `locality`,
//! `region` (optional for GB) and `postcode`. The same regex serves both recognition
//! (finding candidates in page text) and decomposition (splitting a candidate into fields).

use crate::extract::structured::from_captures;
use crate::extract::AddressCandidate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// United States street-line + city + state + ZIP
static US_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?P<number>\d{1,6})[\ ]+
        (?P<street>
            (?:[A-Za-z0-9][A-Za-z0-9'.-]*[\ ]+){0,4}?
            (?i:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Way|Court|Ct
               |Place|Pl|Parkway|Pkwy|Highway|Hwy|Circle|Cir|Terrace|Ter|Square|Sq
               |Trail|Trl|Plaza|Plz)\b\.?
        )
        (?:[\ ]*,?[\ ]*(?i:Suite|Ste|Unit|Apt|\x23)[\ ]*[A-Za-z0-9-]+)?
        (?:\s*,\s*|\s+)
        (?P<locality>[A-Za-z][A-Za-z.'-]*(?:[\ ][A-Za-z][A-Za-z.'-]*){0,3}?)
        (?:\s*,\s*|\s+)
        (?P<region>AL|AK|AZ|AR|CA|CO|CT|DE|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS
                  |MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA
                  |WV|WI|WY|DC|PR)
        [\ ]+
        (?P<postcode>\d{5}(?:-\d{4})?)\b
        ",
    )
    .expect("US address pattern compiles")
});

/// Great Britain street-line + town + optional county + postcode
static GB_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \b(?P<number>\d{1,5}[A-Za-z]?)[\ ]+
        (?P<street>
            (?:[A-Za-z][A-Za-z'.-]*[\ ]+){0,4}?
            (?i:Street|St|Road|Rd|Lane|Ln|Avenue|Ave|Close|Way|Drive|Dr|Place|Pl|Square|Sq
               |Crescent|Cres|Terrace|Gardens|Gdns|Hill|Row|Court|Ct|Mews|Walk|Green
               |Parade|Grove|Park)\b\.?
        )
        \s*,\s*
        (?P<locality>[A-Za-z][A-Za-z'-]*(?:[\ ][A-Za-z][A-Za-z'-]*){0,3}?)
        (?:\s*,\s*(?P<region>[A-Za-z][A-Za-z'-]*(?:[\ ][A-Za-z][A-Za-z'-]*){0,3}?))?
        (?:\s*,\s*|\s+)
        (?P<postcode>[A-Z]{1,2}[0-9][A-Z0-9]?[\ ]?[0-9][A-Z]{2})\b
        ",
    )
    .expect("GB address pattern compiles")
});

/// The address convention a pattern recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Locale {
    Us,
    Gb,
}

impl Locale {
    /// Country written into structured addresses decomposed under this locale
    pub fn country(&self) -> &'static str {
        match self {
            Self::Us => "USA",
            Self::Gb => "UK",
        }
    }

    /// Built-in recognition pattern for this locale
    pub fn pattern(&self) -> &'static Regex {
        match self {
            Self::Us => &US_ADDRESS,
            Self::Gb => &GB_ADDRESS,
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Us, Self::Gb]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Us => write!(f, "US"),
            Self::Gb => write!(f, "GB"),
        }
    }
}

/// One extraction pass: a regex tagged with the locale it reports
#[derive(Debug, Clone)]
pub struct RegexPattern {
    pub locale: Locale,
    pub regex: Regex,
}

impl RegexPattern {
    /// The built-in pass for a locale
    pub fn builtin(locale: Locale) -> Self {
        Self {
            locale,
            regex: locale.pattern().clone(),
        }
    }

    /// Returns every match in `text` as a candidate
    ///
    /// The candidate text is whitespace-collapsed into canonical form. Its structured
    /// fields are captured here, against the original text, because line breaks inside
    /// the match decide where the street ends and the locality begins.
    pub fn find_candidates(&self, text: &str) -> Vec<AddressCandidate> {
        self.regex
            .captures_iter(text)
            .filter_map(|captures| {
                let whole = captures.get(0)?;
                Some(AddressCandidate {
                    text: collapse_whitespace(whole.as_str()),
                    locale: self.locale,
                    address: from_captures(&captures, self.locale),
                })
            })
            .collect()
    }

    /// Returns the canonical text of every match in `text`
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.find_candidates(text)
            .into_iter()
            .map(|candidate| candidate.text)
            .collect()
    }
}

/// Collapses every whitespace run to a single space
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
