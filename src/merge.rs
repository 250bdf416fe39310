//! Merge engine: reconciles a listing stub with a detail record
//!
//! Field precedence: the stub wins `video_id` (it identified the detail
//! fetch in the first place), `date` and `rating` exist only on listing
//! pages, and the detail page is authoritative for everything else since it
//! is scraped from the canonical record page. Merging is deterministic and
//! total.

use crate::records::{MergedWork, VideoDetail, WorkStub};

fn prefer(primary: String, fallback: String) -> String {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// Combines a stub and a detail record into one canonical work
pub fn merge(stub: WorkStub, detail: VideoDetail) -> MergedWork {
    MergedWork {
        rank: None,
        video_id: prefer(stub.video_id, detail.video_id),
        code: prefer(detail.code, stub.code),
        title: prefer(detail.title, stub.title),
        date: stub.date,
        rating: stub.rating,
        tags: detail.tags,
        series: detail.series,
        actors: detail.actors,
        magnets: detail.magnets,
        thumbnail_images: detail.thumbnail_images,
        preview_video: detail.preview_video,
        url: prefer(detail.url, stub.url),
    }
}
