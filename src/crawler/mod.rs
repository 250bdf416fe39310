//! Pagination crawler: walks listing endpoints and aggregates ranked worklists
//!
//! The crawler drives the fetcher and extractors page by page, optionally
//! resolving every listing stub to its detail record, and assigns stable
//! 1-based ranks over the final aggregated order.

mod coordinator;
mod endpoint;

pub use coordinator::Crawler;
pub use endpoint::{DetailMode, Endpoint};
