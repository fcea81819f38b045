use crate::config::types::{Config, CrawlerConfig, GeocoderConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_geocoder_config(&config.geocoder)?;

    if config.input.domains_path.is_empty() {
        return Err(ConfigError::Validation(
            "domains_path cannot be empty".to_string(),
        ));
    }

    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 || config.timeout_seconds > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be between 1 and 120, got {}",
            config.timeout_seconds
        )));
    }

    if config.max_depth < 1 || config.max_depth > 5 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and 5, got {}",
            config.max_depth
        )));
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.max_pages_per_domain == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages_per_domain must be >= 1 when set".to_string(),
        ));
    }

    if config.domain_budget_seconds == Some(0) {
        return Err(ConfigError::Validation(
            "domain_budget_seconds must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates geocoder configuration (only when enabled)
fn validate_geocoder_config(config: &GeocoderConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid geocoder endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Geocoder endpoint must use http or https, got '{}'",
            config.endpoint
        )));
    }

    if config.timeout_seconds < 1 || config.timeout_seconds > 120 {
        return Err(ConfigError::Validation(format!(
            "geocoder timeout_seconds must be between 1 and 120, got {}",
            config.timeout_seconds
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("database_path", &config.database_path),
        ("results_path", &config.results_path),
        ("summary_path", &config.summary_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Must contain exactly one @ with text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }

    #[test]
    fn test_crawler_bounds() {
        let mut config = CrawlerConfig::default();
        assert!(validate_crawler_config(&config).is_ok());

        config.timeout_seconds = 0;
        assert!(validate_crawler_config(&config).is_err());

        config = CrawlerConfig::default();
        config.max_depth = 6;
        assert!(validate_crawler_config(&config).is_err());

        config = CrawlerConfig::default();
        config.max_pages_per_domain = Some(0);
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_disabled_geocoder_skips_endpoint_check() {
        let config = GeocoderConfig {
            enabled: false,
            endpoint: "not a url".to_string(),
            timeout_seconds: 5,
        };
        assert!(validate_geocoder_config(&config).is_ok());
    }

    #[test]
    fn test_geocoder_endpoint_scheme() {
        let config = GeocoderConfig {
            enabled: true,
            endpoint: "ftp://geo.example.com".to_string(),
            timeout_seconds: 5,
        };
        assert!(matches!(
            validate_geocoder_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
