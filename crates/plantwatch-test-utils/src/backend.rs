// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock telemetry backend on top of `wiremock`.

use plantwatch_config::model::{ApiConfig, PlantwatchConfig};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A local HTTP server that answers the telemetry REST paths.
///
/// Mounted routes verify their expected hit counts when the backend is
/// dropped, so `expect(n)` doubles as a request-count assertion.
pub struct TestBackend {
    server: MockServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Base URL clients should use, including the `/api` prefix.
    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    /// An `[api]` section pointing at this backend with no retries and
    /// short delays.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            timeout_ms: 2_000,
            max_retries: 0,
            retry_delay_ms: 10,
        }
    }

    /// A full configuration around [`api_config`](Self::api_config).
    pub fn config(&self) -> PlantwatchConfig {
        PlantwatchConfig {
            api: self.api_config(),
            ..Default::default()
        }
    }

    /// Answers `GET /api{route}` with `status` and a JSON body, expecting
    /// exactly `hits` requests.
    pub async fn mount_get(&self, route: &str, status: u16, body: Value, hits: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api{route}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    /// Answers `POST /api{route}` with `status` and a JSON body, expecting
    /// exactly `hits` requests.
    pub async fn mount_post(&self, route: &str, status: u16, body: Value, hits: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/api{route}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(hits)
            .mount(&self.server)
            .await;
    }

    /// Number of requests received on `GET /api{route}` so far.
    pub async fn hits(&self, route: &str) -> usize {
        let full = format!("/api{route}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == full)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mounted_route_answers_and_counts() {
        let backend = TestBackend::start().await;
        backend
            .mount_get("/telemetry/devices", 200, json!(["dev-1"]), 1)
            .await;

        let body: Value = reqwest::get(format!("{}/telemetry/devices", backend.base_url()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!(["dev-1"]));
        assert_eq!(backend.hits("/telemetry/devices").await, 1);
    }

    #[tokio::test]
    async fn api_config_points_at_api_prefix() {
        let backend = TestBackend::start().await;
        assert!(backend.api_config().base_url.ends_with("/api"));
        assert_eq!(backend.api_config().max_retries, 0);
    }
}
