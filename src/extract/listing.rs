//! Listing-page extraction
//!
//! Parses one page of search/listing results into [`WorkStub`]s plus the
//! next-page indicator. A stub without a recognizable video id is dropped;
//! a parse failure on one item never aborts its siblings.

use crate::records::{ActorHit, PageResult, WorkStub};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static VIDEO_HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/v/([a-zA-Z0-9]+)").unwrap());
static CODE_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Za-z]{2,6}-?\d{2,5})").unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap());
static ACTOR_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/actors/([a-zA-Z0-9_-]+)").unwrap());

/// Parses one listing page into stubs and the next-page indicator
pub fn parse_listing_page(html: &str, base_url: &str, page: u32) -> PageResult<WorkStub> {
    let document = Html::parse_document(html);

    let mut works = Vec::new();
    if let Ok(item_selector) = Selector::parse("div.item a.box") {
        for item in document.select(&item_selector) {
            if let Some(stub) = parse_work_item(item, base_url) {
                works.push(stub);
            }
        }
    }

    let has_next = Selector::parse(r#"nav.pagination a[rel="next"]"#)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false);

    PageResult {
        page,
        has_next,
        works,
    }
}

/// Parses a single listing anchor into a stub
///
/// The video id from the `/v/<id>` href segment is required; every other
/// field degrades to an empty string.
pub fn parse_work_item(item: ElementRef<'_>, base_url: &str) -> Option<WorkStub> {
    let href = item.value().attr("href").unwrap_or("");
    let video_id = VIDEO_HREF_RE.captures(href)?[1].to_string();

    let title = item.value().attr("title").unwrap_or("").to_string();

    let mut code = String::new();
    if let Ok(selector) = Selector::parse(".video-title") {
        if let Some(element) = item.select(&selector).next() {
            let text = element.text().collect::<String>();
            if let Some(captures) = CODE_SEARCH_RE.captures(&text) {
                code = captures[1].to_uppercase();
            }
        }
    }

    let mut date = String::new();
    if let Ok(selector) = Selector::parse(".meta") {
        if let Some(element) = item.select(&selector).next() {
            let text = element.text().collect::<String>();
            if let Some(captures) = DATE_RE.captures(&text) {
                date = captures[1].to_string();
            }
        }
    }

    let mut rating = String::new();
    if let Ok(selector) = Selector::parse(".score, .rating") {
        if let Some(element) = item.select(&selector).next() {
            rating = element.text().collect::<String>().trim().to_string();
        }
    }

    Some(WorkStub {
        video_id,
        code,
        title,
        date,
        rating,
        url: join_url(base_url, href),
    })
}

/// Parses actor search results, keeping only exact name matches
///
/// The anchor `title` attribute carries comma-separated aliases; a hit is
/// emitted only when one alias equals the queried name.
pub fn parse_actor_results(html: &str, base_url: &str, actor_name: &str) -> Vec<ActorHit> {
    let document = Html::parse_document(html);
    let mut actors = Vec::new();

    let Ok(item_selector) = Selector::parse(".actor-box, .actors .item") else {
        return actors;
    };
    let Ok(link_selector) = Selector::parse("a") else {
        return actors;
    };

    for item in document.select(&item_selector) {
        let Some(link) = item.select(&link_selector).next() else {
            continue;
        };
        let href = link.value().attr("href").unwrap_or("");
        if !href.starts_with("/actors") {
            continue;
        }
        let Some(captures) = ACTOR_HREF_RE.captures(href) else {
            continue;
        };
        let actor_id = captures[1].to_string();

        let aliases = link.value().attr("title").unwrap_or("");
        let matched = aliases
            .split(',')
            .map(str::trim)
            .find(|alias| *alias == actor_name);
        let Some(name) = matched else {
            continue;
        };

        actors.push(ActorHit {
            name: name.to_string(),
            actor_id,
            url: join_url(base_url, href),
        });
    }

    actors
}

fn join_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base_url).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"
        <html><body>
        <div class="item">
          <a class="box" href="/v/AAAbbb" title="untitled work">
            <div class="video-title">no code here</div>
            <div class="meta">2026-03-04</div>
            <div class="score">4.57分</div>
          </a>
        </div>
        <div class="item">
          <a class="box" href="/v/BBBccc" title="CODE-123 second work">
            <div class="video-title">CODE-123 second work</div>
            <div class="meta">2025-12-01</div>
            <div class="rating">3.9分</div>
          </a>
        </div>
        <div class="item">
          <a class="box" href="/nowhere" title="broken item"></a>
        </div>
        <nav class="pagination"><a rel="next" href="?page=2">下一頁</a></nav>
        </body></html>
    "#;

    #[test]
    fn test_parses_items_and_next_indicator() {
        let result = parse_listing_page(LISTING_PAGE, "https://javdb.com", 1);
        assert_eq!(result.page, 1);
        assert!(result.has_next);
        assert_eq!(result.works.len(), 2);
    }

    #[test]
    fn test_item_without_code_still_emitted() {
        let result = parse_listing_page(LISTING_PAGE, "https://javdb.com", 1);
        let first = &result.works[0];
        assert_eq!(first.video_id, "AAAbbb");
        assert_eq!(first.code, "");
        assert_eq!(first.date, "2026-03-04");
        assert_eq!(first.rating, "4.57分");
        assert_eq!(first.url, "https://javdb.com/v/AAAbbb");
    }

    #[test]
    fn test_code_extracted_and_uppercased() {
        let result = parse_listing_page(LISTING_PAGE, "https://javdb.com", 1);
        assert_eq!(result.works[1].video_id, "BBBccc");
        assert_eq!(result.works[1].code, "CODE-123");
    }

    #[test]
    fn test_item_without_video_id_dropped() {
        let result = parse_listing_page(LISTING_PAGE, "https://javdb.com", 1);
        assert!(result.works.iter().all(|w| w.title != "broken item"));
    }

    #[test]
    fn test_no_pagination_means_no_next() {
        let html = r#"<div class="item"><a class="box" href="/v/XyZ123"></a></div>"#;
        let result = parse_listing_page(html, "https://javdb.com", 3);
        assert!(!result.has_next);
        assert_eq!(result.page, 3);
        assert_eq!(result.works.len(), 1);
    }

    #[test]
    fn test_empty_page_yields_no_works() {
        let result = parse_listing_page("<html></html>", "https://javdb.com", 1);
        assert!(result.works.is_empty());
        assert!(!result.has_next);
    }

    const ACTOR_PAGE: &str = r#"
        <html><body>
        <div class="actor-box">
          <a href="/actors/AbC12" title="井上もも, Momo Inoue"></a>
        </div>
        <div class="actor-box">
          <a href="/actors/XyZ99" title="別の人"></a>
        </div>
        <div class="actor-box">
          <a href="/search?q=x" title="井上もも"></a>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_actor_exact_match_on_alias() {
        let actors = parse_actor_results(ACTOR_PAGE, "https://javdb.com", "井上もも");
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].actor_id, "AbC12");
        assert_eq!(actors[0].name, "井上もも");
        assert_eq!(actors[0].url, "https://javdb.com/actors/AbC12");
    }

    #[test]
    fn test_actor_alias_match_accepts_secondary_name() {
        let actors = parse_actor_results(ACTOR_PAGE, "https://javdb.com", "Momo Inoue");
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].name, "Momo Inoue");
    }

    #[test]
    fn test_actor_no_match() {
        let actors = parse_actor_results(ACTOR_PAGE, "https://javdb.com", "unknown");
        assert!(actors.is_empty());
    }
}
