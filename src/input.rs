//! Domain list input
//!
//! The input is a plain text file with one domain per line. Blank lines and `#` comments
//! are ignored, as is a leading `domain` header line, so a single-column CSV export can
//! be used as-is.

use crate::ScoutError;
use std::fs;
use std::path::Path;

/// Header accepted on the first non-empty line
const HEADER: &str = "domain";

/// Reads the ordered domain list from a file
pub fn read_domains(path: &Path) -> Result<Vec<String>, ScoutError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ScoutError::Input(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(parse_domains(&content))
}

/// Parses a domain list, keeping input order and duplicates
pub fn parse_domains(content: &str) -> Vec<String> {
    let mut domains = Vec::new();
    let mut first = true;

    for line in content.lines() {
        // Single-column CSV rows may be quoted
        let line = line.trim().trim_matches('"').trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if first && line.eq_ignore_ascii_case(HEADER) {
            first = false;
            continue;
        }
        first = false;

        domains.push(line.to_string());
    }

    domains
}
