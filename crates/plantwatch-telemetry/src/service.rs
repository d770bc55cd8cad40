// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached telemetry access layer.
//!
//! [`TelemetryService`] fronts the backend with the [`TelemetryCache`]. Reads
//! serve a fresh cached value when one exists and otherwise perform a retrying
//! GET. Terminal failures are logged and turned into safe defaults; they
//! never reach the caller and never touch the stored fetch time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use plantwatch_client::RetryingClient;
use plantwatch_config::model::PlantwatchConfig;
use plantwatch_core::{
    DataKind, DeviceDescriptor, LatestEntry, MetricKind, PlantwatchError, TelemetrySample,
    TelemetrySource,
};
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::cache::{SeriesKind, TelemetryCache};
use crate::expiry::ExpiryPolicy;

const TELEMETRY: &str = "telemetry";

/// Telemetry reads, invalidation and threshold access for one backend.
#[derive(Debug)]
pub struct TelemetryService {
    client: RetryingClient,
    expiry: ExpiryPolicy,
    cache: Mutex<TelemetryCache>,
}

impl TelemetryService {
    pub fn new(client: RetryingClient, expiry: ExpiryPolicy) -> Self {
        Self {
            client,
            expiry,
            cache: Mutex::new(TelemetryCache::new()),
        }
    }

    /// Builds the client and expiry policy from a loaded configuration.
    pub fn from_config(config: &PlantwatchConfig) -> Result<Self, PlantwatchError> {
        let client = RetryingClient::from_config(&config.api)?;
        Ok(Self::new(client, ExpiryPolicy::from_config(&config.cache)))
    }

    pub fn expiry(&self) -> &ExpiryPolicy {
        &self.expiry
    }

    pub fn client(&self) -> &RetryingClient {
        &self.client
    }

    /// Historical samples for `device_id`, newest first as the backend
    /// returns them.
    pub async fn historical(&self, device_id: &str) -> Vec<TelemetrySample> {
        self.series(SeriesKind::Historical, device_id).await
    }

    /// Realtime window for `device_id`.
    pub async fn realtime(&self, device_id: &str) -> Vec<TelemetrySample> {
        self.series(SeriesKind::Realtime, device_id).await
    }

    /// Most recent entry for `device_id`.
    pub async fn latest(&self, device_id: &str) -> Option<LatestEntry> {
        let now = Instant::now();
        let ticket = {
            let cache = self.lock();
            if let Some(entry) = cache.fresh_latest(device_id, now, self.expiry.latest) {
                debug!(device_id, kind = %DataKind::Latest, "cache hit");
                return Some(entry);
            }
            cache.ticket(device_id)
        };
        debug!(device_id, kind = %DataKind::Latest, "cache miss, fetching");

        match self.fetch(&[TELEMETRY, "latest", device_id]).await {
            Ok(body) => {
                let entry = body.as_ref().and_then(LatestEntry::from_value);
                if !self.lock().store_latest(device_id, entry.clone(), now, ticket) {
                    debug!(device_id, kind = %DataKind::Latest, "discarding result for invalidated device");
                }
                entry
            }
            Err(err) => {
                error!(device_id, kind = %DataKind::Latest, error = %err, "failed to fetch telemetry");
                None
            }
        }
    }

    /// All devices known to the backend.
    pub async fn device_list(&self) -> Vec<DeviceDescriptor> {
        let now = Instant::now();
        let ticket = {
            let cache = self.lock();
            if let Some(devices) = cache.fresh_device_list(now, self.expiry.device_list) {
                debug!(kind = %DataKind::DeviceList, "cache hit");
                return devices;
            }
            cache.list_ticket()
        };
        debug!(kind = %DataKind::DeviceList, "cache miss, fetching");

        match self.fetch(&[TELEMETRY, "devices"]).await {
            Ok(body) => {
                let devices = body
                    .as_ref()
                    .map(DeviceDescriptor::list_from_value)
                    .unwrap_or_default();
                if !self.lock().store_device_list(devices.clone(), now, ticket) {
                    debug!(kind = %DataKind::DeviceList, "discarding result for cleared cache");
                }
                devices
            }
            Err(err) => {
                error!(kind = %DataKind::DeviceList, error = %err, "failed to fetch device list");
                Vec::new()
            }
        }
    }

    /// Alert threshold for one metric of a device. Never cached.
    pub async fn get_threshold(&self, device_id: &str, metric: MetricKind) -> Option<f64> {
        let metric_segment = metric.to_string();
        let result = self
            .fetch(&[TELEMETRY, "threshold", device_id, &metric_segment])
            .await;
        match result {
            Ok(body) => body
                .as_ref()
                .and_then(|b| b.get("threshold"))
                .and_then(threshold_value),
            Err(err) => {
                error!(device_id, metric = %metric, error = %err, "failed to fetch threshold");
                None
            }
        }
    }

    /// Stores a new alert threshold. Returns whether the backend accepted it.
    pub async fn set_threshold(&self, device_id: &str, metric: MetricKind, value: f64) -> bool {
        let metric_segment = metric.to_string();
        let result = self
            .client
            .post_json(
                &[TELEMETRY, "threshold", device_id, &metric_segment],
                json!({ "threshold": value }),
            )
            .await;
        match result {
            Ok(response) => {
                info!(device_id, metric = %metric, value, status = response.status, "threshold updated");
                true
            }
            Err(err) => {
                error!(device_id, metric = %metric, error = %err, "failed to update threshold");
                false
            }
        }
    }

    /// Replaces several thresholds of a device in one request and returns the
    /// backend's reply. Failures are returned, not swallowed.
    pub async fn update_thresholds(
        &self,
        device_id: &str,
        thresholds: &HashMap<MetricKind, f64>,
    ) -> Result<Option<Value>, PlantwatchError> {
        let body = serde_json::to_value(thresholds)
            .map_err(|e| PlantwatchError::Internal(format!("failed to encode thresholds: {e}")))?;
        let response = self
            .client
            .post_json(&[TELEMETRY, "threshold", device_id], body)
            .await?;
        info!(device_id, count = thresholds.len(), "thresholds updated");
        response.json()
    }

    /// Drops the historical, realtime and latest entries of one device.
    pub fn invalidate(&self, device_id: &str) {
        self.lock().invalidate_device(device_id);
        info!(device_id, "cleared cache for device");
    }

    /// Drops every cached entry, the device list included.
    pub fn invalidate_all(&self) {
        self.lock().clear();
        info!("cleared all telemetry cache");
    }

    /// Releases all cached data. The service stays usable; the next read
    /// of anything is a live fetch.
    pub fn dispose(&self) {
        self.lock().clear();
        debug!("telemetry service disposed");
    }

    /// When the slot for `kind` was last filled, if it is populated.
    /// `device_id` is ignored for [`DataKind::DeviceList`].
    pub fn cached_at(&self, kind: DataKind, device_id: &str) -> Option<Instant> {
        self.lock().fetched_at(kind, device_id)
    }

    async fn series(&self, kind: SeriesKind, device_id: &str) -> Vec<TelemetrySample> {
        let data_kind = kind.data_kind();
        let now = Instant::now();
        let ticket = {
            let cache = self.lock();
            if let Some(series) =
                cache.fresh_series(kind, device_id, now, self.expiry.ttl(data_kind))
            {
                debug!(device_id, kind = %data_kind, "cache hit");
                return series;
            }
            cache.ticket(device_id)
        };
        debug!(device_id, kind = %data_kind, "cache miss, fetching");

        let result = match kind {
            SeriesKind::Historical => self.fetch(&[TELEMETRY, device_id]).await,
            SeriesKind::Realtime => self.fetch(&[TELEMETRY, "realtime", device_id]).await,
        };

        match result {
            Ok(body) => {
                let series = body
                    .as_ref()
                    .map(TelemetrySample::series_from_value)
                    .unwrap_or_default();
                if !self
                    .lock()
                    .store_series(kind, device_id, series.clone(), now, ticket)
                {
                    debug!(device_id, kind = %data_kind, "discarding result for invalidated device");
                }
                series
            }
            Err(err) => {
                error!(device_id, kind = %data_kind, error = %err, "failed to fetch telemetry");
                Vec::new()
            }
        }
    }

    /// GET and decode. A falsy body (empty or `null`) is `Ok(None)`.
    async fn fetch(&self, segments: &[&str]) -> Result<Option<Value>, PlantwatchError> {
        self.client.get(segments).await?.json()
    }

    fn lock(&self) -> MutexGuard<'_, TelemetryCache> {
        // Entries are replaced whole, so a poisoned cache is still consistent.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Threshold payloads carry a number or a numeric string; `null` is unset.
fn threshold_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl TelemetrySource for TelemetryService {
    async fn historical(&self, device_id: &str) -> Vec<TelemetrySample> {
        TelemetryService::historical(self, device_id).await
    }

    async fn realtime(&self, device_id: &str) -> Vec<TelemetrySample> {
        TelemetryService::realtime(self, device_id).await
    }

    async fn latest(&self, device_id: &str) -> Option<LatestEntry> {
        TelemetryService::latest(self, device_id).await
    }

    async fn device_list(&self) -> Vec<DeviceDescriptor> {
        TelemetryService::device_list(self).await
    }

    fn invalidate(&self, device_id: &str) {
        TelemetryService::invalidate(self, device_id);
    }

    fn invalidate_all(&self) {
        TelemetryService::invalidate_all(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> TelemetryService {
        let client = RetryingClient::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
        TelemetryService::new(client, ExpiryPolicy::default())
    }

    #[test]
    fn threshold_value_accepts_numbers_and_numeric_strings() {
        assert_eq!(threshold_value(&json!(75)), Some(75.0));
        assert_eq!(threshold_value(&json!("42.5")), Some(42.5));
        assert_eq!(threshold_value(&Value::Null), None);
        assert_eq!(threshold_value(&json!({"value": 1})), None);
    }

    #[test]
    fn new_service_has_empty_cache() {
        let service = service();
        for kind in [
            DataKind::Historical,
            DataKind::Realtime,
            DataKind::Latest,
            DataKind::DeviceList,
        ] {
            assert!(service.cached_at(kind, "dev-1").is_none());
        }
    }

    #[test]
    fn from_config_uses_configured_expiry() {
        let mut config = PlantwatchConfig::default();
        config.cache.latest_ttl_ms = 250;
        let service = TelemetryService::from_config(&config).unwrap();
        assert_eq!(service.expiry().latest, Duration::from_millis(250));
        assert_eq!(service.client().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn from_config_rejects_bad_base_url() {
        let mut config = PlantwatchConfig::default();
        config.api.base_url = "not a url".into();
        assert!(matches!(
            TelemetryService::from_config(&config),
            Err(PlantwatchError::Config(_))
        ));
    }
}
