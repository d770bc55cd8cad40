// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response values exchanged with [`RetryingClient`](crate::RetryingClient).

use std::time::Duration;

use plantwatch_core::PlantwatchError;
use reqwest::{Method, Url};
use serde_json::Value;

/// Delay between attempts when none is configured.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// A single logical request together with its retry policy.
///
/// `retry_count` is owned by the request: the client increments it before
/// every resubmission and stops once it reaches `max_retries`.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
    /// Retries allowed after the first attempt. `0` disables retrying.
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Retries performed so far.
    pub retry_count: u32,
}

impl RequestConfig {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            retry_count: 0,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post_json(url: Url, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::POST, url)
        }
    }

    /// Sets the retry bound and the constant delay between attempts.
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Whether another attempt is allowed after a failure.
    pub fn can_retry(&self) -> bool {
        self.retry_count < self.max_retries
    }
}

/// A successful (2xx) backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub text: String,
}

impl HttpResponse {
    /// Decodes the body as JSON. Empty text and JSON `null` are absent.
    pub fn json(&self) -> Result<Option<Value>, PlantwatchError> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(PlantwatchError::Decode {
                message: format!("response body is not JSON: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}
