//! Configuration module
//!
//! Loads and validates TOML configuration. Every key has a default matching
//! the live catalog, so an absent or partial file still yields a working
//! config.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CacheConfig, Config, SessionConfig, SiteConfig};
