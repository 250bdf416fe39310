//! HTTP client with retry and multi-host failover
//!
//! All catalog hosts are interchangeable mirrors. A request goes to the
//! current host; block-style responses (403/503) rotate to the next host and
//! retry immediately, while transport errors and other HTTP failures sleep a
//! fixed backoff before retrying. Only after the retry budget is exhausted
//! does a fetch fail, carrying the last underlying cause.

use crate::config::SiteConfig;
use crate::{ConfigError, FetchCause, Result, ScrapeError};
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// A successful (HTTP 200) fetch
#[derive(Debug)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Snapshot of the client's request counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FetchStats {
    pub request_count: u64,
    pub success_count: u64,
    /// Percentage of attempts that returned HTTP 200
    pub success_rate: f64,
}

/// HTTP client owning the host list, current-host index, and counters
///
/// Failover state is instance-scoped and survives across pages and crawls on
/// the same client. The cookie jar is supplied by the session provider; the
/// client reads it but never mutates cookies itself.
pub struct HttpClient {
    client: Client,
    hosts: Vec<String>,
    host_index: usize,
    retry_times: u32,
    backoff: Duration,
    request_count: u64,
    success_count: u64,
}

impl HttpClient {
    /// Builds a client from site configuration and an optional cookie jar
    ///
    /// The host list must be non-empty; an empty list fails with a
    /// validation error regardless of how the config was constructed.
    pub fn new(config: &SiteConfig, jar: Option<Arc<Jar>>) -> Result<Self> {
        if config.hosts.is_empty() {
            return Err(ScrapeError::Config(ConfigError::Validation(
                "at least one host is required".to_string(),
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8,ja;q=0.7"),
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true);

        if let Some(jar) = jar {
            builder = builder.cookie_provider(jar);
        }

        Ok(Self {
            client: builder.build()?,
            hosts: config.hosts.clone(),
            host_index: 0,
            retry_times: config.retry_times,
            backoff: Duration::from_millis(config.backoff_ms),
            request_count: 0,
            success_count: 0,
        })
    }

    /// Origin of the current host
    ///
    /// Hosts are bare domains in production config; entries that already
    /// carry a scheme (test servers) pass through unchanged.
    pub fn base_url(&self) -> String {
        let host = &self.hosts[self.host_index];
        if host.contains("://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host)
        }
    }

    fn full_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}/{}", self.base_url(), path)
        }
    }

    fn switch_host(&mut self) {
        self.host_index = (self.host_index + 1) % self.hosts.len();
    }

    /// Fetches a path, retrying across hosts until success or budget exhaustion
    ///
    /// Every attempt counts toward `request_count`, including attempts
    /// consumed by host-switch retries.
    pub async fn fetch(&mut self, method: Method, path: &str) -> Result<FetchResponse> {
        let mut url = self.full_url(path);
        let mut last_cause = FetchCause::Exhausted;

        for attempt in 0..self.retry_times {
            self.request_count += 1;

            match self.client.request(method.clone(), &url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::OK {
                        let final_url = response.url().to_string();
                        match response.text().await {
                            Ok(body) => {
                                self.success_count += 1;
                                return Ok(FetchResponse {
                                    final_url,
                                    status: status.as_u16(),
                                    body,
                                });
                            }
                            Err(e) => {
                                last_cause = FetchCause::Transport(e);
                                tokio::time::sleep(self.backoff).await;
                                continue;
                            }
                        }
                    }

                    // 403/503 are host-level blocks: rotate and go again
                    // without burning a backoff sleep.
                    if status == StatusCode::FORBIDDEN || status == StatusCode::SERVICE_UNAVAILABLE
                    {
                        tracing::warn!(
                            "Host {} returned {}, switching host (attempt {})",
                            self.hosts[self.host_index],
                            status.as_u16(),
                            attempt + 1
                        );
                        last_cause = FetchCause::Status(status.as_u16());
                        self.switch_host();
                        url = self.full_url(path);
                        continue;
                    }

                    tracing::debug!("HTTP {} for {}, backing off", status.as_u16(), url);
                    last_cause = FetchCause::Status(status.as_u16());
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => {
                    tracing::debug!("Transport error for {}: {}, backing off", url, e);
                    last_cause = FetchCause::Transport(e);
                    tokio::time::sleep(self.backoff).await;
                }
            }
        }

        Err(ScrapeError::Fetch {
            path: path.to_string(),
            cause: last_cause,
        })
    }

    /// Convenience wrapper for GET requests
    pub async fn get(&mut self, path: &str) -> Result<FetchResponse> {
        self.fetch(Method::GET, path).await
    }

    /// Counter snapshot for observability
    pub fn stats(&self) -> FetchStats {
        let success_rate = if self.request_count > 0 {
            self.success_count as f64 / self.request_count as f64 * 100.0
        } else {
            0.0
        };
        FetchStats {
            request_count: self.request_count,
            success_count: self.success_count,
            success_rate,
        }
    }
}
