use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[site]
hosts = ["javdb.com", "javdb570.com"]
timeout-secs = 15
retry-times = 5
backoff-ms = 500
sleep-ms = 1000
max-pages = 4
user-agent = "test-agent"

[session]
cookie-file = "./cookies.json"

[cache]
tags-path = "./tags.enc"
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.hosts.len(), 2);
        assert_eq!(config.site.timeout_secs, 15);
        assert_eq!(config.site.retry_times, 5);
        assert_eq!(config.site.max_pages, 4);
        assert_eq!(config.cache.tags_path, "./tags.enc");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let file = create_temp_config("[site]\nmax-pages = 2\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.site.max_pages, 2);
        assert_eq!(config.site.retry_times, 3);
        assert_eq!(config.site.hosts.len(), 3);
        assert_eq!(config.session.cookie_file, "cookies.json");
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.site.timeout_secs, 30);
        assert_eq!(config.site.sleep_ms, 2000);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[site]\nhosts = []\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
