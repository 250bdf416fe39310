//! Crawl coordination: drives the fetcher and extractors across pages
//!
//! Requests are strictly sequential. Pages are fetched in ascending order
//! and, in full-detail mode, detail pages are fetched in stub order, so
//! output order is deterministic for a given catalog state. Pacing delays
//! between requests are mandatory sleeps, separate from the fetcher's
//! failure backoff.

use crate::client::{FetchStats, HttpClient};
use crate::config::Config;
use crate::crawler::endpoint::{DetailMode, Endpoint};
use crate::extract::{extract_detail, parse_actor_results, parse_listing_page};
use crate::merge::merge;
use crate::records::{ActorHit, MergedWork, PageResult, VideoDetail, WorkStub};
use crate::session::Session;
use crate::Result;
use std::time::Duration;

/// The pagination crawler
///
/// Owns the HTTP client for its whole lifetime: failover state and request
/// counters survive across pages and across crawls on the same instance.
pub struct Crawler {
    client: HttpClient,
    sleep: Duration,
    max_pages: u32,
}

impl Crawler {
    /// Creates a crawler from configuration and an optional session
    pub fn new(config: &Config, session: Option<&Session>) -> Result<Self> {
        let jar = session.map(|s| s.cookie_jar());
        let client = HttpClient::new(&config.site, jar)?;
        Ok(Self::with_client(client, config))
    }

    /// Wraps an existing client, keeping its failover state and counters
    pub fn with_client(client: HttpClient, config: &Config) -> Self {
        Self {
            client,
            sleep: Duration::from_millis(config.site.sleep_ms),
            max_pages: config.site.max_pages,
        }
    }

    /// Request counter snapshot from the underlying client
    pub fn stats(&self) -> FetchStats {
        self.client.stats()
    }

    /// Borrows the underlying client, e.g. to hand to the taxonomy store
    pub fn client_mut(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    /// Fetches and extracts one detail page
    pub async fn video_detail(&mut self, video_id: &str) -> Result<VideoDetail> {
        let response = self.client.get(&format!("/v/{}", video_id)).await?;
        Ok(extract_detail(&response.body, video_id, &response.final_url))
    }

    /// Searches by work code and returns the first hit's full detail
    pub async fn video_by_code(&mut self, code: &str) -> Result<Option<VideoDetail>> {
        let encoded: String = url::form_urlencoded::byte_serialize(code.as_bytes()).collect();
        let response = self.client.get(&format!("/search?q={}", encoded)).await?;
        let listing = parse_listing_page(&response.body, &self.client.base_url(), 1);
        match listing.works.into_iter().next() {
            Some(stub) => Ok(Some(self.video_detail(&stub.video_id).await?)),
            None => Ok(None),
        }
    }

    /// Searches for an actor by name (exact alias match)
    pub async fn search_actor(&mut self, actor_name: &str) -> Result<Vec<ActorHit>> {
        let encoded: String = url::form_urlencoded::byte_serialize(actor_name.as_bytes()).collect();
        let response = self
            .client
            .get(&format!("/search?q={}&f=actor", encoded))
            .await?;
        Ok(parse_actor_results(
            &response.body,
            &self.client.base_url(),
            actor_name,
        ))
    }

    /// Fetches one listing page of an endpoint (stubs only)
    pub async fn works_page(&mut self, endpoint: &Endpoint, page: u32) -> Result<PageResult<WorkStub>> {
        let path = endpoint.page_path(page)?;
        tracing::debug!("Fetching listing page {} via {}", page, path);
        let response = self.client.get(&path).await?;
        let result = parse_listing_page(&response.body, &self.client.base_url(), page);
        tracing::debug!(
            "Page {}: {} works, has_next={}",
            page,
            result.works.len(),
            result.has_next
        );
        Ok(result)
    }

    /// Fetches one listing page and resolves every stub to a merged record
    ///
    /// A per-item failure (network or parse) degrades that item to its bare
    /// stub instead of aborting the page. Detail fetches are paced.
    pub async fn works_page_full(
        &mut self,
        endpoint: &Endpoint,
        page: u32,
    ) -> Result<PageResult<MergedWork>> {
        let listing = self.works_page(endpoint, page).await?;
        let total = listing.works.len();
        let mut works = Vec::with_capacity(total);

        for (index, stub) in listing.works.into_iter().enumerate() {
            let merged = match self.video_detail(&stub.video_id).await {
                Ok(detail) => merge(stub, detail),
                Err(e) => {
                    tracing::warn!(
                        "Detail fetch for {} failed, keeping listing stub: {}",
                        stub.video_id,
                        e
                    );
                    MergedWork::from_stub(stub)
                }
            };
            works.push(merged);
            if index + 1 < total {
                tokio::time::sleep(self.sleep).await;
            }
        }

        Ok(PageResult {
            page: listing.page,
            has_next: listing.has_next,
            works,
        })
    }

    /// Walks an endpoint page by page and returns the ranked worklist
    ///
    /// Terminates when the site reports no next page or the page budget is
    /// spent; both are normal. Ranks 1..N are assigned over the final
    /// accumulated order once the walk completes.
    pub async fn collect_works(
        &mut self,
        endpoint: &Endpoint,
        mode: DetailMode,
    ) -> Result<Vec<MergedWork>> {
        let mut works: Vec<MergedWork> = Vec::new();
        let mut page = 1;
        let mut has_next = true;

        while has_next && page <= self.max_pages {
            let result = match mode {
                DetailMode::Basic => {
                    let listing = self.works_page(endpoint, page).await?;
                    PageResult {
                        page: listing.page,
                        has_next: listing.has_next,
                        works: listing.works.into_iter().map(MergedWork::from_stub).collect(),
                    }
                }
                DetailMode::Full => self.works_page_full(endpoint, page).await?,
            };

            works.extend(result.works);
            has_next = result.has_next;

            if has_next {
                page += 1;
                if page <= self.max_pages {
                    tokio::time::sleep(self.sleep).await;
                }
            }
        }

        for (index, work) in works.iter_mut().enumerate() {
            work.rank = Some(index + 1);
        }

        tracing::info!(
            "Collected {} works across {} page(s)",
            works.len(),
            page.min(self.max_pages)
        );
        Ok(works)
    }

    /// Resolves an actor name and collects their ranked worklist
    pub async fn actor_works(
        &mut self,
        actor_name: &str,
        mode: DetailMode,
    ) -> Result<Vec<MergedWork>> {
        let actors = self.search_actor(actor_name).await?;
        let Some(actor) = actors.into_iter().next() else {
            tracing::warn!("No actor found for '{}'", actor_name);
            return Ok(Vec::new());
        };
        tracing::info!("Resolved actor '{}' to id {}", actor.name, actor.actor_id);
        self.collect_works(&Endpoint::actor(&actor.actor_id), mode).await
    }
}
