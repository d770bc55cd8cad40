// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrying HTTP client for the telemetry backend.
//!
//! Every failed attempt (transport error, timeout, or non-2xx status) is
//! resubmitted unchanged after a constant delay until the request's retry
//! budget is spent. There is no jitter and no exponential backoff.

use std::time::Duration;

use plantwatch_config::model::ApiConfig;
use plantwatch_core::PlantwatchError;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::request::{HttpResponse, RequestConfig};

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl RetryingClient {
    /// Creates a client for `base_url` with a per-attempt `timeout`.
    ///
    /// Requests built through [`get`](Self::get) and [`post_json`](Self::post_json)
    /// start without retries until [`with_retry_policy`](Self::with_retry_policy)
    /// is applied.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PlantwatchError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            PlantwatchError::Config(format!("invalid backend base URL `{base_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PlantwatchError::Config(format!(
                "backend base URL `{base_url}` cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlantwatchError::Http {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            max_retries: 0,
            retry_delay: crate::request::DEFAULT_RETRY_DELAY,
        })
    }

    /// Creates a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, PlantwatchError> {
        Ok(Self::new(&config.base_url, config.timeout())?
            .with_retry_policy(config.max_retries, config.retry_delay()))
    }

    /// Sets the retry policy attached to requests built by this client.
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds `<base_url>/<segment>/<segment>...`, percent-encoding each segment.
    pub fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET the given path with this client's retry policy.
    pub async fn get(&self, segments: &[&str]) -> Result<HttpResponse, PlantwatchError> {
        let request = RequestConfig::get(self.url_for(segments))
            .with_retries(self.max_retries, self.retry_delay);
        self.request(request).await
    }

    /// POST a JSON body to the given path with this client's retry policy.
    pub async fn post_json(
        &self,
        segments: &[&str],
        body: Value,
    ) -> Result<HttpResponse, PlantwatchError> {
        let request = RequestConfig::post_json(self.url_for(segments), body)
            .with_retries(self.max_retries, self.retry_delay);
        self.request(request).await
    }

    /// Sends `config`, resubmitting it after `retry_delay` while its retry
    /// budget lasts. The last failure is returned once the budget is spent.
    pub async fn request(&self, mut config: RequestConfig) -> Result<HttpResponse, PlantwatchError> {
        loop {
            match self.send_once(&config).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && config.can_retry() => {
                    config.retry_count += 1;
                    warn!(
                        url = %config.url,
                        attempt = config.retry_count,
                        max_retries = config.max_retries,
                        error = %err,
                        "retrying request"
                    );
                    tokio::time::sleep(config.retry_delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, config: &RequestConfig) -> Result<HttpResponse, PlantwatchError> {
        let mut builder = self.client.request(config.method.clone(), config.url.clone());
        if let Some(body) = &config.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(url = %config.url, status = %status, retry = config.retry_count, "response received");

        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(PlantwatchError::Http {
                message: format!("backend returned {status}: {}", truncate(&text)),
                status: Some(status.as_u16()),
                source: None,
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            text,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> PlantwatchError {
        if e.is_timeout() {
            PlantwatchError::Timeout {
                duration: self.timeout,
            }
        } else {
            PlantwatchError::Http {
                message: format!("HTTP request failed: {e}"),
                status: None,
                source: Some(Box::new(e)),
            }
        }
    }
}

/// Keeps error bodies (often HTML error pages) short in logs.
fn truncate(body: &str) -> &str {
    const MAX: usize = 256;
    if body.len() <= MAX {
        return body;
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
