//! Typed records produced by the extractors and the merge engine
//!
//! Every sequence field is always present (possibly empty), never absent.
//! `video_id` is the identity key for both stubs and details.

use serde::{Deserialize, Serialize};

/// Minimal record parsed from one listing-page anchor
///
/// `video_id` is the only field guaranteed to be non-empty; everything else
/// may be an empty string when the listing markup lacks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStub {
    pub video_id: String,
    pub code: String,
    pub title: String,
    pub date: String,
    pub rating: String,
    pub url: String,
}

/// One magnet link with its advertised size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetEntry {
    pub magnet: String,
    pub size_text: String,
    pub size_mb: f64,
}

/// Thumbnail URLs for a work
///
/// `synthesized` marks lists that were guessed from the URL template rather
/// than scraped from the page; guessed URLs may 404.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    pub urls: Vec<String>,
    pub synthesized: bool,
}

/// Full record parsed from a work's detail page
///
/// Fields the page does not carry default to empty; `magnets` is sorted
/// descending by `size_mb` with unparsable sizes (0) last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDetail {
    pub video_id: String,
    pub code: String,
    pub title: String,
    pub tags: Vec<String>,
    pub series: String,
    pub actors: Vec<String>,
    pub magnets: Vec<MagnetEntry>,
    pub thumbnail_images: ThumbnailSet,
    pub preview_video: String,
    pub url: String,
}

/// Union of a listing stub and a detail record
///
/// `rank` is the 1-based position assigned after a multi-page aggregation
/// completes; single-page results carry no rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedWork {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub video_id: String,
    pub code: String,
    pub title: String,
    pub date: String,
    pub rating: String,
    pub tags: Vec<String>,
    pub series: String,
    pub actors: Vec<String>,
    pub magnets: Vec<MagnetEntry>,
    pub thumbnail_images: ThumbnailSet,
    pub preview_video: String,
    pub url: String,
}

impl MergedWork {
    /// Lifts a bare stub into the merged shape with empty detail fields
    ///
    /// Used when a detail fetch or parse fails and the page falls back to
    /// emitting the listing data it already has.
    pub fn from_stub(stub: WorkStub) -> Self {
        Self {
            rank: None,
            video_id: stub.video_id,
            code: stub.code,
            title: stub.title,
            date: stub.date,
            rating: stub.rating,
            tags: Vec::new(),
            series: String::new(),
            actors: Vec::new(),
            magnets: Vec::new(),
            thumbnail_images: ThumbnailSet::default(),
            preview_video: String::new(),
            url: stub.url,
        }
    }
}

/// One actor search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorHit {
    pub name: String,
    pub actor_id: String,
    pub url: String,
}

/// Result of fetching and parsing a single listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub page: u32,
    pub has_next: bool,
    pub works: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub() -> WorkStub {
        WorkStub {
            video_id: "YwG8Ve".to_string(),
            code: "MIDA-583".to_string(),
            title: "title".to_string(),
            date: "2026-03-04".to_string(),
            rating: "4.57分".to_string(),
            url: "https://javdb.com/v/YwG8Ve".to_string(),
        }
    }

    #[test]
    fn test_from_stub_keeps_listing_fields() {
        let merged = MergedWork::from_stub(stub());
        assert_eq!(merged.video_id, "YwG8Ve");
        assert_eq!(merged.date, "2026-03-04");
        assert_eq!(merged.rating, "4.57分");
        assert!(merged.tags.is_empty());
        assert!(merged.magnets.is_empty());
        assert_eq!(merged.rank, None);
    }

    #[test]
    fn test_rank_not_serialized_when_absent() {
        let merged = MergedWork::from_stub(stub());
        let json = serde_json::to_string(&merged).unwrap();
        assert!(!json.contains("\"rank\""));
    }

    #[test]
    fn test_sequences_serialize_as_arrays_when_empty() {
        let detail = VideoDetail::default();
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json["tags"].is_array());
        assert!(json["actors"].is_array());
        assert!(json["magnets"].is_array());
        assert!(json["thumbnail_images"]["urls"].is_array());
    }
}
