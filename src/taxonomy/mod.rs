//! Tag taxonomy: fetch, cache, and query the category -> tag mapping
//!
//! The taxonomy translates human tag names into the `c<N>=<id>` query
//! parameters used by tag-filtered searches. It is fetched once from the
//! origin (an authenticated session is required), persisted obfuscated at
//! rest, and served cache-first afterwards.

pub mod cipher;
mod parse;
mod store;
mod types;

pub use parse::parse_tags_page;
pub use store::{parse_selector, tag_query_string, TagSelectors, TaxonomyStore};
pub use types::{Category, CategorySummary, TagEntry, TagId, TagMatch, Taxonomy};
