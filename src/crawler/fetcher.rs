//! HTTP fetcher implementation
//!
//! This module handles every page request made by the crawler:
//! - Building the HTTP client with the crawler's user agent
//! - A single GET per URL, bounded by a per-request timeout
//! - Classifying the outcome (page, soft error, hard error)
//!
//! There is no retry logic. One attempt per URL bounds the worst-case run time across
//! a large domain list.

use crate::config::UserAgentConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::error::Error as _;
use std::fmt;
use std::time::Duration;

/// Why a request produced no content but the crawl may go on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftErrorReason {
    /// The HTTP exchange completed with a status other than 200
    Status(u16),

    /// TLS certificate validation or handshake failed
    Ssl(String),

    /// DNS failure, refused or reset connection, timeout, truncated body
    Network(String),

    /// The page is not HTML (the received Content-Type, possibly empty)
    ContentType(String),
}

impl fmt::Display for SoftErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Ssl(msg) => write!(f, "ssl: {}", msg),
            Self::Network(msg) => write!(f, "network: {}", msg),
            Self::ContentType(content_type) => write!(f, "not HTML: '{}'", content_type),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Status 200 with a readable body
    Fetched {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Recoverable failure; the URL counts as visited but contributes nothing
    SoftError(SoftErrorReason),

    /// The request could not even be attempted (bad URL, redirect loop)
    HardError(String),
}

/// Builds an HTTP client with proper configuration
///
/// Certificate verification stays on and redirects follow the client default policy.
///
/// # Example
///
/// ```no_run
/// use address_scout::config::UserAgentConfig;
/// use address_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "AddressScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(5)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 | `Fetched` |
/// | Any other status | `SoftError(Status)` |
/// | Content-Type not HTML | `SoftError(ContentType)` |
/// | TLS/SSL error | `SoftError(Ssl)` |
/// | Timeout, DNS, connection refused/reset | `SoftError(Network)` |
/// | Unbuildable request, redirect loop | `HardError` |
pub async fn fetch_url(client: &Client, url: &str, timeout: Duration) -> FetchOutcome {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(url, &e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if status != StatusCode::OK {
        tracing::debug!("{} answered HTTP {}", url, status.as_u16());
        return FetchOutcome::SoftError(SoftErrorReason::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        tracing::debug!("{} is not HTML ({})", url, content_type);
        return FetchOutcome::SoftError(SoftErrorReason::ContentType(content_type));
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Fetched {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => {
            tracing::debug!("Failed to read body of {}: {}", url, e);
            FetchOutcome::SoftError(SoftErrorReason::Network(e.to_string()))
        }
    }
}

/// Returns true for HTML media types, ignoring parameters such as `charset`
fn is_html(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "text/html" || media_type == "application/xhtml+xml"
}

/// Maps a transport error to a fetch outcome
fn classify_error(url: &str, e: &reqwest::Error) -> FetchOutcome {
    if e.is_builder() {
        tracing::debug!("Could not build request for {}: {}", url, e);
        return FetchOutcome::HardError(e.to_string());
    }

    if e.is_redirect() {
        tracing::debug!("Redirect failure for {}: {}", url, e);
        return FetchOutcome::HardError(e.to_string());
    }

    if is_tls_failure(e) {
        tracing::debug!("TLS failure for {}: {}", url, e);
        return FetchOutcome::SoftError(SoftErrorReason::Ssl(describe(e)));
    }

    if e.is_timeout() {
        return FetchOutcome::SoftError(SoftErrorReason::Network("Request timeout".to_string()));
    }

    tracing::debug!("Network failure for {}: {}", url, e);
    FetchOutcome::SoftError(SoftErrorReason::Network(describe(e)))
}

/// Returns true if any error in the source chain reports a certificate or TLS problem
fn is_tls_failure(e: &reqwest::Error) -> bool {
    let mut source = e.source();
    while let Some(err) = source {
        let message = err.to_string().to_ascii_lowercase();
        if message.contains("certificate")
            || message.contains("tls")
            || message.contains("ssl")
            || message.contains("handshake")
        {
            return true;
        }
        source = err.source();
    }
    false
}

/// Formats an error with its innermost cause, which is usually the useful part
fn describe(e: &reqwest::Error) -> String {
    let mut innermost = e.to_string();
    let mut source = e.source();
    while let Some(err) = source {
        innermost = err.to_string();
        source = err.source();
    }
    innermost
}
