//! Detail-page extraction
//!
//! Pure functions from a parsed document to a [`VideoDetail`]; no I/O
//! happens here. Any field the page does not carry comes back empty.

use crate::records::{MagnetEntry, ThumbnailSet, VideoDetail};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TITLE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|.*$").unwrap());
static CODE_EXACT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)[A-Za-z]+-?\d+$").unwrap());
static CODE_SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Za-z]{2,6}-?\d{2,5})").unwrap());
static SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)([\d.]+)\s*(GB|MB)").unwrap());

/// Extracts the full detail record from a work's page
pub fn extract_detail(html: &str, video_id: &str, url: &str) -> VideoDetail {
    let document = Html::parse_document(html);

    VideoDetail {
        video_id: video_id.to_string(),
        code: extract_code(&document),
        title: extract_title(&document),
        tags: extract_labeled_links(&document, "類別"),
        series: extract_labeled_links(&document, "系列")
            .into_iter()
            .next()
            .unwrap_or_default(),
        actors: extract_actors(&document),
        magnets: extract_magnets(&document),
        thumbnail_images: extract_thumbnails(video_id, &document),
        preview_video: extract_preview_video(&document),
        url: url.to_string(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-empty title from the selector cascade, with any trailing
/// `"| ..."` site suffix stripped
pub fn extract_title(document: &Html) -> String {
    for candidate in ["h1.title", ".video-title", "h1", "title"] {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element_text(element);
            if !text.is_empty() {
                return TITLE_SUFFIX_RE.replace(&text, "").trim().to_string();
            }
        }
    }
    String::new()
}

/// Work code, preferring the copy-button attribute over a title scan
pub fn extract_code(document: &Html) -> String {
    if let Ok(selector) = Selector::parse(".panel-block.first-block .copy-to-clipboard") {
        if let Some(button) = document.select(&selector).next() {
            if let Some(code) = button.value().attr("data-clipboard-text") {
                if CODE_EXACT_RE.is_match(code) {
                    return code.to_uppercase();
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("h1.title, .video-title") {
        if let Some(element) = document.select(&selector).next() {
            let text = element_text(element);
            if let Some(captures) = CODE_SEARCH_RE.captures(&text) {
                return captures[1].to_uppercase();
            }
        }
    }

    String::new()
}

/// Link texts from the first `.panel-block` whose heading contains `marker`
fn extract_labeled_links(document: &Html, marker: &str) -> Vec<String> {
    let Ok(block_selector) = Selector::parse(".panel-block") else {
        return Vec::new();
    };
    let Ok(strong_selector) = Selector::parse("strong") else {
        return Vec::new();
    };
    let Ok(link_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    for block in document.select(&block_selector) {
        let heading = match block.select(&strong_selector).next() {
            Some(strong) => element_text(strong),
            None => continue,
        };
        if !heading.contains(marker) {
            continue;
        }
        return block
            .select(&link_selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
    }

    Vec::new()
}

/// Actor names, dropping the single-glyph gender markers
pub fn extract_actors(document: &Html) -> Vec<String> {
    extract_labeled_links(document, "演員")
        .into_iter()
        .filter(|name| name != "♀" && name != "♂")
        .collect()
}

/// Magnet entries sorted descending by size; unparsable sizes sort last
pub fn extract_magnets(document: &Html) -> Vec<MagnetEntry> {
    let mut magnets = Vec::new();

    let Ok(container_selector) = Selector::parse("#magnets-content") else {
        return magnets;
    };
    let Some(container) = document.select(&container_selector).next() else {
        return magnets;
    };

    let Ok(item_selector) = Selector::parse(".item") else {
        return magnets;
    };
    let Ok(button_selector) = Selector::parse(".copy-to-clipboard") else {
        return magnets;
    };
    let Ok(meta_selector) = Selector::parse(".meta") else {
        return magnets;
    };

    for item in container.select(&item_selector) {
        let Some(button) = item.select(&button_selector).next() else {
            continue;
        };
        let magnet = button.value().attr("data-clipboard-text").unwrap_or("");
        if !magnet.starts_with("magnet:") {
            continue;
        }

        let size_text = item
            .select(&meta_selector)
            .next()
            .map(element_text)
            .unwrap_or_else(|| "未知大小".to_string());

        magnets.push(MagnetEntry {
            magnet: magnet.to_string(),
            size_text: size_text.clone(),
            size_mb: parse_size(&size_text),
        });
    }

    // Stable sort keeps encounter order among equal sizes.
    magnets.sort_by(|a, b| {
        b.size_mb
            .partial_cmp(&a.size_mb)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    magnets
}

/// Parses a human size like `5.27GB` into megabytes; unparsable -> 0
pub fn parse_size(size_text: &str) -> f64 {
    let Some(captures) = SIZE_RE.captures(size_text) else {
        return 0.0;
    };
    let size: f64 = match captures[1].parse() {
        Ok(n) => n,
        Err(_) => return 0.0,
    };
    if captures[2].eq_ignore_ascii_case("GB") {
        size * 1024.0
    } else {
        size
    }
}

/// Preview video URL, if the page embeds one
pub fn extract_preview_video(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("video source, video") {
        if let Some(element) = document.select(&selector).next() {
            if let Some(src) = element.value().attr("src") {
                if !src.is_empty() {
                    return src.to_string();
                }
            }
        }
    }

    if let Ok(container_selector) = Selector::parse(".preview-video, .video-preview") {
        if let Some(container) = document.select(&container_selector).next() {
            if let Ok(video_selector) = Selector::parse("video") {
                if let Some(video) = container.select(&video_selector).next() {
                    let src = video
                        .value()
                        .attr("src")
                        .or_else(|| video.value().attr("data-src"))
                        .unwrap_or("");
                    if !src.is_empty() {
                        return src.to_string();
                    }
                }
            }
        }
    }

    String::new()
}

/// High-definition thumbnail URLs
///
/// Prefers images scraped from the preview container, normalizing the
/// small-size `_s_` segment to `_l_`. With no container the set is
/// synthesized from the CDN template keyed by the id prefix; those URLs are
/// best-effort guesses and may 404, hence the `synthesized` flag.
pub fn extract_thumbnails(video_id: &str, document: &Html) -> ThumbnailSet {
    let mut urls = Vec::new();

    if let Ok(container_selector) = Selector::parse(".preview-images, .video-images, .tile-images")
    {
        if let Some(container) = document.select(&container_selector).next() {
            if let Ok(image_selector) = Selector::parse("img, a.tile-item") {
                for element in container.select(&image_selector) {
                    let src = element
                        .value()
                        .attr("src")
                        .or_else(|| element.value().attr("data-src"))
                        .unwrap_or("");
                    if !src.is_empty() {
                        urls.push(src.replace("_s_", "_l_"));
                    }
                }
            }
        }
    }

    if !urls.is_empty() {
        return ThumbnailSet {
            urls,
            synthesized: false,
        };
    }

    let prefix: String = video_id.chars().take(2).collect::<String>().to_lowercase();
    let urls = (0..10)
        .map(|i| {
            format!(
                "https://c0.jdbstatic.com/samples/{}/{}_l_{}.jpg",
                prefix, video_id, i
            )
        })
        .collect();
    ThumbnailSet {
        urls,
        synthesized: true,
    }
}
