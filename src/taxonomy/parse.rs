//! Parser for the tag taxonomy page
//!
//! The taxonomy page links every tag as an anchor whose href carries a
//! `c<N>=<id>` pair. Anchors are grouped by category number; display names
//! come from a fixed table since the page markup for headings is unstable.

use crate::taxonomy::types::{Category, TagEntry, TagId, Taxonomy};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;

static TAG_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"c(\d+)=(\d+)").unwrap());

/// Display names for the known category numbers
fn category_name(key: &str) -> String {
    match key {
        "c1" => "基本".to_string(),
        "c2" => "年份".to_string(),
        "c3" => "主題".to_string(),
        "c4" => "角色".to_string(),
        "c5" => "服裝".to_string(),
        "c6" => "體型".to_string(),
        "c7" => "行為".to_string(),
        other => format!("分类{}", other),
    }
}

/// Parses the taxonomy page into categories of id-sorted tags
///
/// `updated_at` is left empty; the store stamps it when persisting.
pub fn parse_tags_page(html: &str) -> Taxonomy {
    let document = Html::parse_document(html);
    let mut grouped: BTreeMap<String, Vec<TagEntry>> = BTreeMap::new();

    if let Ok(anchor_selector) = Selector::parse(r#"a[href*="/tags?c"]"#) {
        for anchor in document.select(&anchor_selector) {
            let href = anchor.value().attr("href").unwrap_or("");
            let Some(captures) = TAG_PARAM_RE.captures(href) else {
                continue;
            };

            let cat_key = format!("c{}", &captures[1]);
            let raw_id = &captures[2];
            let name = anchor.text().collect::<String>().trim().to_string();
            if name.is_empty() {
                continue;
            }

            let id = match raw_id.parse::<i64>() {
                Ok(n) => TagId::Num(n),
                Err(_) => TagId::Text(raw_id.to_string()),
            };

            grouped.entry(cat_key).or_default().push(TagEntry {
                id,
                name,
                value: raw_id.to_string(),
            });
        }
    }

    let mut categories = BTreeMap::new();
    for (key, mut tags) in grouped {
        tags.sort_by_key(|tag| tag.id.sort_key());
        categories.insert(
            key.clone(),
            Category {
                name: category_name(&key),
                tags,
            },
        );
    }

    Taxonomy {
        categories,
        updated_at: String::new(),
    }
}
