//! URL handling module for Address-Scout
//!
//! This module provides seed URL construction, same-origin checks, canonical URL keys
//! for the visited set, and host extraction.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::canonical_url;

/// The (scheme, host, port) triple that defines an origin
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Authority {
    /// Returns the authority of a URL, or `None` for URLs without a host (`mailto:`, `data:`, ...)
    pub fn of(url: &Url) -> Option<Self> {
        let host = extract_domain(url)?;
        Some(Self {
            scheme: url.scheme().to_ascii_lowercase(),
            host,
            port: url.port_or_known_default(),
        })
    }
}

/// Builds the seed URL for a domain
///
/// Bare domains are fetched over plain `http://`, leaving any upgrade to the server's
/// redirect. Inputs that already carry a scheme are used as given.
///
/// # Examples
///
/// ```
/// use address_scout::url::seed_url;
///
/// let url = seed_url("Example.com").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/");
/// ```
pub fn seed_url(domain: &str) -> Result<Url, UrlError> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(UrlError::MissingDomain);
    }

    let candidate = if domain.contains("://") {
        domain.to_string()
    } else {
        format!("http://{}", domain)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", domain, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns true when both URLs share scheme, host and port
///
/// URLs without a host never share an origin with anything.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    match (Authority::of(a), Authority::of(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
