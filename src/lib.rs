//! javdb-client: a resilient scraper for the JavDB video catalog
//!
//! This crate extracts structured video, actor, and tag records from the
//! paginated catalog, tolerating an unreliable network layer through host
//! failover and retry, and caching the tag taxonomy locally so tag-filtered
//! queries can be built without hitting the site.

pub mod client;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod merge;
pub mod records;
pub mod session;
pub mod taxonomy;

use thiserror::Error;

/// Main error type for scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed for {path} after all retries: {cause}")]
    Fetch { path: String, cause: FetchCause },

    #[error("Invalid tag query: {0}")]
    InvalidQuery(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The last underlying cause recorded before the retry budget ran out
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("no attempt completed")]
    Exhausted,
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
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{FetchStats, HttpClient};
pub use config::Config;
pub use crawler::{Crawler, DetailMode, Endpoint};
pub use records::{MagnetEntry, MergedWork, PageResult, VideoDetail, WorkStub};
pub use taxonomy::{TagId, Taxonomy, TaxonomyStore};
