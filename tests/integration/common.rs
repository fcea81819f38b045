//! Shared helpers for the integration tests

use address_scout::config::{
    Config, CrawlerConfig, GeocoderConfig, InputConfig, OutputConfig, UserAgentConfig,
};
use address_scout::crawler::{build_http_client, CrawlLimits, SiteCrawler};
use std::path::Path;
use std::time::Duration;
use wiremock::ResponseTemplate;

pub fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestScout".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Creates a test configuration with every file under `dir`
pub fn create_test_config(dir: &Path, geocoder_endpoint: Option<String>) -> Config {
    let path = |name: &str| dir.join(name).to_string_lossy().into_owned();

    Config {
        crawler: CrawlerConfig {
            timeout_seconds: 2,
            ..CrawlerConfig::default()
        },
        user_agent: user_agent(),
        geocoder: GeocoderConfig {
            enabled: geocoder_endpoint.is_some(),
            endpoint: geocoder_endpoint.unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
            timeout_seconds: 2,
        },
        input: InputConfig {
            domains_path: path("domains.txt"),
        },
        output: OutputConfig {
            database_path: path("scout.db"),
            results_path: path("results.json"),
            summary_path: path("summary.md"),
        },
    }
}

pub fn crawler(limits: CrawlLimits) -> SiteCrawler {
    let client = build_http_client(&user_agent(), Duration::from_secs(2))
        .expect("Failed to build client");
    SiteCrawler::new(client, limits)
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ),
        "text/html",
    )
}
