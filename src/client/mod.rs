//! HTTP layer: resilient fetching with retry and host failover

mod fetcher;

pub use fetcher::{FetchResponse, FetchStats, HttpClient};
