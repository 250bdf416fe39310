use crate::config::types::{CacheConfig, Config, SiteConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.hosts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one host is required".to_string(),
        ));
    }

    for host in &config.hosts {
        if host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "host entries cannot be empty".to_string(),
            ));
        }
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.retry_times < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-times must be >= 1, got {}",
            config.retry_times
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.tags_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "tags-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
