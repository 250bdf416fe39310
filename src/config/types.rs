use serde::Deserialize;

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Catalog site and request behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Interchangeable mirror hosts, tried in order on block responses
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry budget per fetch (attempts across all hosts)
    #[serde(rename = "retry-times", default = "default_retry_times")]
    pub retry_times: u32,

    /// Fixed backoff between failed attempts (milliseconds)
    #[serde(rename = "backoff-ms", default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Mandatory pacing delay between successive requests (milliseconds)
    #[serde(rename = "sleep-ms", default = "default_sleep_ms")]
    pub sleep_ms: u64,

    /// Page budget for one multi-page crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            timeout_secs: default_timeout_secs(),
            retry_times: default_retry_times(),
            backoff_ms: default_backoff_ms(),
            sleep_ms: default_sleep_ms(),
            max_pages: default_max_pages(),
            user_agent: default_user_agent(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path to the cookie file written by the login collaborator
    #[serde(rename = "cookie-file", default = "default_cookie_file")]
    pub cookie_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_file: default_cookie_file(),
        }
    }
}

/// Local cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Path of the obfuscated taxonomy cache blob
    #[serde(rename = "tags-path", default = "default_tags_path")]
    pub tags_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tags_path: default_tags_path(),
        }
    }
}

fn default_hosts() -> Vec<String> {
    vec![
        "javdb.com".to_string(),
        "javdb570.com".to_string(),
        "javdb372.com".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_times() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2000
}

fn default_sleep_ms() -> u64 {
    2000
}

fn default_max_pages() -> u32 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_cookie_file() -> String {
    "cookies.json".to_string()
}

fn default_tags_path() -> String {
    "output/tags_database.enc".to_string()
}
