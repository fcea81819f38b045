//! Address-Scout: a postal address harvester for company websites
//!
//! This crate visits a list of company domains, crawls each site's same-origin pages,
//! extracts and normalizes postal addresses from the page text, optionally validates them
//! against a geocoding service, and keeps an append-only, resumable log of per-domain results.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod storage;
pub mod text;
pub mod url;
pub mod validate;

use thiserror::Error;

/// Main error type for Address-Scout operations
///
/// Per-site failures never show up here: they are folded into typed outcomes by the
/// stage that observed them. This enum covers the run's own infrastructure.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Address-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract, AddressCandidate, Locale, StructuredAddress};
pub use output::{compute_statistics, Aggregator, DomainResult, ResultLog, RunStatistics};
pub use state::{CrawlPhase, DomainStatus};
pub use text::normalize;
pub use url::{canonical_url, same_origin, seed_url};
