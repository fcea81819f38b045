use serde::Deserialize;

/// Main configuration structure for Address-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of link hops from the seed page
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of fetches per domain, seed included
    #[serde(rename = "max-pages-per-domain", default)]
    pub max_pages_per_domain: Option<u32>,

    /// Wall-clock budget for a single domain (seconds)
    #[serde(rename = "domain-budget-seconds", default)]
    pub domain_budget_seconds: Option<u64>,

    /// Number of domains processed concurrently
    #[serde(default = "default_workers")]
    pub workers: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_depth: default_max_depth(),
            max_pages_per_domain: None,
            domain_budget_seconds: None,
            workers: default_workers(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the outgoing `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Whether candidate addresses are validated at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of a Nominatim-compatible search service
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,

    /// Timeout for a single lookup (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_geocoder_endpoint(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Input dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the domain list (one domain per line)
    #[serde(rename = "domains-path")]
    pub domains_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding the result log
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the JSON results file rewritten after every domain
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

fn default_timeout_seconds() -> u64 {
    5
}

fn default_max_depth() -> u32 {
    1
}

fn default_workers() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_geocoder_endpoint() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}
