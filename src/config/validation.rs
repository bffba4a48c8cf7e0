use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Largest number of entries the Sitemaps protocol allows in one file
pub const PROTOCOL_ENTRY_LIMIT: usize = 50_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 1024 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 1024, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.request_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "request_attempts must be >= 1, got {}",
            config.request_attempts
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.sitemap_entry_limit < 1 || config.sitemap_entry_limit > PROTOCOL_ENTRY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "sitemap_entry_limit must be between 1 and {}, got {}",
            PROTOCOL_ENTRY_LIMIT, config.sitemap_entry_limit
        )));
    }

    if config.queue_size < 1 {
        return Err(ConfigError::Validation(
            "queue_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}
