//! Cached taxonomy store
//!
//! The store is the sole reader and writer of the on-disk cache file. Loading
//! is cache-first: once a taxonomy has been persisted it is served without
//! any network access until a forced refresh. The cache is a single blob,
//! either cipher-obfuscated JSON or (for files written before obfuscation
//! existed) plain JSON; the loader tries each decoder in order and an
//! unreadable file simply counts as a miss.

use crate::client::HttpClient;
use crate::taxonomy::cipher;
use crate::taxonomy::parse::parse_tags_page;
use crate::taxonomy::types::{CategorySummary, TagEntry, TagMatch, Taxonomy};
use crate::{Result, ScrapeError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Tag selectors for a combined query: category number -> tag id
pub type TagSelectors = BTreeMap<u32, u32>;

/// Serializes selectors as `c<N>=<id>` pairs joined by `&`
///
/// At least one selector is required; the check runs before any network call.
pub fn tag_query_string(selectors: &TagSelectors) -> Result<String> {
    if selectors.is_empty() {
        return Err(ScrapeError::InvalidQuery(
            "at least one tag selector is required (e.g. c1=23)".to_string(),
        ));
    }
    Ok(selectors
        .iter()
        .map(|(cat, id)| format!("c{}={}", cat, id))
        .collect::<Vec<_>>()
        .join("&"))
}

/// Parses a `c<N>=<id>` selector argument into its numeric parts
pub fn parse_selector(arg: &str) -> Result<(u32, u32)> {
    let invalid = || ScrapeError::InvalidQuery(format!("invalid selector '{}', expected cN=ID", arg));
    let (key, value) = arg.split_once('=').ok_or_else(invalid)?;
    let number = key.strip_prefix('c').ok_or_else(invalid)?;
    let category: u32 = number.parse().map_err(|_| invalid())?;
    let tag_id: u32 = value.parse().map_err(|_| invalid())?;
    Ok((category, tag_id))
}

type Decoder = fn(&str) -> Option<Taxonomy>;

fn decode_obfuscated(raw: &str) -> Option<Taxonomy> {
    let plain = cipher::decode(raw, cipher::CACHE_KEY).ok()?;
    serde_json::from_str(&plain).ok()
}

fn decode_plain(raw: &str) -> Option<Taxonomy> {
    serde_json::from_str(raw).ok()
}

// Ordered decode strategies; first success wins.
const DECODERS: &[Decoder] = &[decode_obfuscated, decode_plain];

/// Fetches, caches, and queries the tag taxonomy
pub struct TaxonomyStore {
    db_path: PathBuf,
    base_url: String,
    cached: Option<Taxonomy>,
}

impl TaxonomyStore {
    /// Creates a store over the given cache path
    ///
    /// `base_url` is only used by [`build_query_url`](Self::build_query_url).
    pub fn new<P: AsRef<Path>>(db_path: P, base_url: &str) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cached: None,
        }
    }

    /// Returns the taxonomy, fetching from the origin only when needed
    ///
    /// With `force_update` false and a cache file present, the persisted
    /// taxonomy is returned without touching the network. Otherwise the
    /// taxonomy page is fetched through `client` (which carries the
    /// authenticated session), parsed, persisted over any prior cache, and
    /// returned.
    pub async fn fetch(&mut self, client: &mut HttpClient, force_update: bool) -> Result<Taxonomy> {
        if !force_update && self.db_path.exists() {
            tracing::debug!("Using cached taxonomy at {}", self.db_path.display());
            return Ok(self.load().clone());
        }

        tracing::info!("Fetching tag taxonomy from origin");
        let response = client.get("/tags").await?;
        let mut taxonomy = parse_tags_page(&response.body);
        taxonomy.updated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        self.save(&taxonomy)?;
        tracing::info!(
            "Persisted taxonomy: {} categories, updated {}",
            taxonomy.categories.len(),
            taxonomy.updated_at
        );
        self.cached = Some(taxonomy.clone());
        Ok(taxonomy)
    }

    /// Loads the persisted taxonomy, or an empty one if unreadable
    pub fn load(&mut self) -> &Taxonomy {
        if self.cached.is_none() {
            self.cached = Some(self.read_cache_file());
        }
        self.cached.as_ref().unwrap()
    }

    fn read_cache_file(&self) -> Taxonomy {
        let raw = match std::fs::read_to_string(&self.db_path) {
            Ok(raw) => raw,
            Err(_) => return Taxonomy::default(),
        };
        for decode in DECODERS {
            if let Some(taxonomy) = decode(&raw) {
                return taxonomy;
            }
        }
        tracing::warn!(
            "Taxonomy cache at {} unreadable by any decoder, treating as empty",
            self.db_path.display()
        );
        Taxonomy::default()
    }

    fn save(&self, taxonomy: &Taxonomy) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(taxonomy)?;
        std::fs::write(&self.db_path, cipher::encode(&json, cipher::CACHE_KEY))?;
        Ok(())
    }

    /// Finds a tag by category key and id (string-coerced comparison)
    pub fn lookup<T: ToString>(&mut self, category: &str, tag_id: T) -> Option<TagEntry> {
        self.load().lookup(category, tag_id).cloned()
    }

    /// Case-insensitive substring search across all categories
    pub fn search_by_name(&mut self, name: &str) -> Vec<TagMatch> {
        self.load().search_by_name(name)
    }

    /// All categories with their tag counts
    pub fn category_list(&mut self) -> Vec<CategorySummary> {
        self.load().category_list()
    }

    /// Builds a full tag-search URL from validated selectors
    pub fn build_query_url(&self, selectors: &TagSelectors) -> Result<String> {
        Ok(format!("{}/tags?{}", self.base_url, tag_query_string(selectors)?))
    }
}
