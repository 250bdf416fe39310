//! Paginated listing endpoints

use crate::taxonomy::{tag_query_string, TagSelectors};
use crate::Result;

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// A paginated listing the crawler can walk
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// All works of one actor
    ActorWorks { actor_id: String },
    /// All works under a single tag id (category 1)
    TagWorks { tag_id: String },
    /// Combined tag search across categories
    TagSearch { selectors: TagSelectors },
    /// Free-text keyword search
    Keyword { query: String },
}

impl Endpoint {
    pub fn actor(actor_id: &str) -> Self {
        Endpoint::ActorWorks {
            actor_id: actor_id.to_string(),
        }
    }

    pub fn tag(tag_id: &str) -> Self {
        Endpoint::TagWorks {
            tag_id: tag_id.to_string(),
        }
    }

    pub fn tags(selectors: TagSelectors) -> Self {
        Endpoint::TagSearch { selectors }
    }

    pub fn keyword(query: &str) -> Self {
        Endpoint::Keyword {
            query: query.to_string(),
        }
    }

    /// Request path for the given page (1-based)
    ///
    /// Page 1 omits the `page` parameter, matching the site's canonical
    /// listing URLs. Fails with `InvalidQuery` before any network call when
    /// a tag search carries no selectors.
    pub fn page_path(&self, page: u32) -> Result<String> {
        let path = match self {
            Endpoint::ActorWorks { actor_id } => {
                if page == 1 {
                    format!("/actors/{}", actor_id)
                } else {
                    format!("/actors/{}?page={}", actor_id, page)
                }
            }
            Endpoint::TagWorks { tag_id } => {
                if page == 1 {
                    format!("/tags?c1={}", tag_id)
                } else {
                    format!("/tags?c1={}&page={}", tag_id, page)
                }
            }
            Endpoint::TagSearch { selectors } => {
                let query = tag_query_string(selectors)?;
                if page == 1 {
                    format!("/tags?{}", query)
                } else {
                    format!("/tags?{}&page={}", query, page)
                }
            }
            Endpoint::Keyword { query } => {
                format!("/search?q={}&page={}", urlencode(query), page)
            }
        };
        Ok(path)
    }
}

/// Whether a crawl stops at listing stubs or fetches every detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    Basic,
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScrapeError;

    #[test]
    fn test_actor_paths() {
        let ep = Endpoint::actor("AbC12");
        assert_eq!(ep.page_path(1).unwrap(), "/actors/AbC12");
        assert_eq!(ep.page_path(3).unwrap(), "/actors/AbC12?page=3");
    }

    #[test]
    fn test_tag_paths() {
        let ep = Endpoint::tag("23");
        assert_eq!(ep.page_path(1).unwrap(), "/tags?c1=23");
        assert_eq!(ep.page_path(2).unwrap(), "/tags?c1=23&page=2");
    }

    #[test]
    fn test_tag_search_serializes_selectors_in_order() {
        let mut selectors = TagSelectors::new();
        selectors.insert(3, 78);
        selectors.insert(1, 23);
        let ep = Endpoint::tags(selectors);
        assert_eq!(ep.page_path(1).unwrap(), "/tags?c1=23&c3=78");
        assert_eq!(ep.page_path(2).unwrap(), "/tags?c1=23&c3=78&page=2");
    }

    #[test]
    fn test_tag_search_without_selectors_rejected() {
        let ep = Endpoint::tags(TagSelectors::new());
        assert!(matches!(ep.page_path(1), Err(ScrapeError::InvalidQuery(_))));
    }

    #[test]
    fn test_keyword_path_is_encoded() {
        let ep = Endpoint::keyword("MIDA-583 夜");
        assert_eq!(ep.page_path(1).unwrap(), "/search?q=MIDA-583+%E5%A4%9C&page=1");
    }
}
