//! Record extraction from catalog HTML
//!
//! Pure parsing only; fetching lives in [`crate::client`] and orchestration
//! in [`crate::crawler`].

mod detail;
mod listing;

pub use detail::{
    extract_actors, extract_code, extract_detail, extract_magnets, extract_preview_video,
    extract_thumbnails, extract_title, parse_size,
};
pub use listing::{parse_actor_results, parse_listing_page, parse_work_item};
