use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tag id as it appears in the taxonomy
///
/// Ids are numeric for almost every tag, but the site uses a few symbolic
/// ones (e.g. `all`), and old cache files may store either form. Lookups
/// compare ids as strings to tolerate the mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagId {
    Num(i64),
    Text(String),
}

impl TagId {
    /// Sort key within a category: numeric ids ascending, symbolic ids first
    pub fn sort_key(&self) -> i64 {
        match self {
            TagId::Num(n) => *n,
            TagId::Text(_) => 0,
        }
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagId::Num(n) => write!(f, "{}", n),
            TagId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One tag within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntry {
    pub id: TagId,
    pub name: String,
    pub value: String,
}

/// One tag category (`c1` through `c7` on the live site)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub tags: Vec<TagEntry>,
}

/// A match returned by [`Taxonomy::search_by_name`]
#[derive(Debug, Clone, Serialize)]
pub struct TagMatch {
    pub category: String,
    pub category_name: String,
    pub tag: TagEntry,
}

/// Summary row for the category listing
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub key: String,
    pub name: String,
    pub tag_count: usize,
}

/// The full category -> tag-id -> name mapping
///
/// Built by one full taxonomy fetch and persisted whole; there are no
/// partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub categories: BTreeMap<String, Category>,
    #[serde(default)]
    pub updated_at: String,
}

impl Taxonomy {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Finds a tag by category key and id, comparing ids as strings
    pub fn lookup<T: ToString>(&self, category: &str, tag_id: T) -> Option<&TagEntry> {
        let wanted = tag_id.to_string();
        self.categories
            .get(category)?
            .tags
            .iter()
            .find(|tag| tag.id.to_string() == wanted)
    }

    /// Case-insensitive substring search across all categories
    pub fn search_by_name(&self, name: &str) -> Vec<TagMatch> {
        let needle = name.to_lowercase();
        let mut matches = Vec::new();
        for (key, category) in &self.categories {
            for tag in &category.tags {
                if tag.name.to_lowercase().contains(&needle) {
                    matches.push(TagMatch {
                        category: key.clone(),
                        category_name: category.name.clone(),
                        tag: tag.clone(),
                    });
                }
            }
        }
        matches
    }

    /// All categories with their tag counts, sorted by key
    pub fn category_list(&self) -> Vec<CategorySummary> {
        self.categories
            .iter()
            .map(|(key, category)| CategorySummary {
                key: key.clone(),
                name: category.name.clone(),
                tag_count: category.tags.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Taxonomy {
        let mut categories = BTreeMap::new();
        categories.insert(
            "c3".to_string(),
            Category {
                name: "主題".to_string(),
                tags: vec![
                    TagEntry {
                        id: TagId::Num(12),
                        name: "出軌".to_string(),
                        value: "12".to_string(),
                    },
                    TagEntry {
                        id: TagId::Num(78),
                        name: "水手服".to_string(),
                        value: "78".to_string(),
                    },
                ],
            },
        );
        categories.insert(
            "c5".to_string(),
            Category {
                name: "服裝".to_string(),
                tags: vec![TagEntry {
                    id: TagId::Text("all".to_string()),
                    name: "全部".to_string(),
                    value: String::new(),
                }],
            },
        );
        Taxonomy {
            categories,
            updated_at: "2026-03-01 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_lookup_coerces_integer_id() {
        let taxonomy = sample();
        let tag = taxonomy.lookup("c3", 78).unwrap();
        assert_eq!(tag.name, "水手服");
    }

    #[test]
    fn test_lookup_coerces_string_id() {
        let taxonomy = sample();
        let tag = taxonomy.lookup("c3", "78").unwrap();
        assert_eq!(tag.name, "水手服");
    }

    #[test]
    fn test_lookup_symbolic_id() {
        let taxonomy = sample();
        assert_eq!(taxonomy.lookup("c5", "all").unwrap().name, "全部");
    }

    #[test]
    fn test_lookup_unknown_category() {
        assert!(sample().lookup("c9", 1).is_none());
    }

    #[test]
    fn test_search_by_name_case_insensitive() {
        let mut taxonomy = sample();
        taxonomy
            .categories
            .get_mut("c3")
            .unwrap()
            .tags
            .push(TagEntry {
                id: TagId::Num(99),
                name: "VR Only".to_string(),
                value: "99".to_string(),
            });
        let matches = taxonomy.search_by_name("vr");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].category, "c3");
        assert_eq!(matches[0].category_name, "主題");
    }

    #[test]
    fn test_search_by_name_no_match_is_empty() {
        assert!(sample().search_by_name("nonexistent").is_empty());
    }

    #[test]
    fn test_category_list_sorted_by_key() {
        let list = sample().category_list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].key, "c3");
        assert_eq!(list[0].tag_count, 2);
        assert_eq!(list[1].key, "c5");
    }

    #[test]
    fn test_tag_id_serializes_untagged() {
        let json = serde_json::to_string(&TagId::Num(78)).unwrap();
        assert_eq!(json, "78");
        let back: TagId = serde_json::from_str("78").unwrap();
        assert_eq!(back, TagId::Num(78));
        let text: TagId = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(text, TagId::Text("all".to_string()));
    }
}
