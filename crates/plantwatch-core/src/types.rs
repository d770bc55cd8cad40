// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical telemetry types shared across the Plantwatch crates.
//!
//! Wire payloads are decoded through raw `serde_json::Value` mirrors and
//! normalized once via [`crate::normalize`], so the rest of the workspace only
//! ever sees plain numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::normalize::{
    normalize_alert_count, normalize_id, normalize_metric, normalize_timestamp,
};

/// Identifier of a monitored device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Metric that carries an alerting threshold.
///
/// The string form is the path segment used by the threshold endpoints.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Temperature,
    Humidity,
    OilLevel,
}

/// Kind of cached telemetry data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum DataKind {
    Historical,
    Realtime,
    Latest,
    DeviceList,
}

impl DataKind {
    /// Kinds that are cached per device.
    pub const PER_DEVICE: [DataKind; 3] = [DataKind::Historical, DataKind::Realtime, DataKind::Latest];
}

/// One time-stamped telemetry reading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSample", rename_all = "camelCase")]
pub struct TelemetrySample {
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature: f64,
    pub humidity: f64,
    pub oil_level: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSample {
    #[serde(default)]
    timestamp: Value,
    #[serde(default)]
    temperature: Value,
    #[serde(default)]
    humidity: Value,
    #[serde(default)]
    oil_level: Value,
}

impl From<RawSample> for TelemetrySample {
    fn from(raw: RawSample) -> Self {
        Self {
            timestamp: normalize_timestamp(&raw.timestamp),
            temperature: normalize_metric(&raw.temperature),
            humidity: normalize_metric(&raw.humidity),
            oil_level: normalize_metric(&raw.oil_level),
        }
    }
}

impl TelemetrySample {
    /// Decodes a series body into samples.
    ///
    /// A non-array body yields an empty series. Elements that are not JSON
    /// objects are dropped.
    pub fn series_from_value(body: &Value) -> Vec<Self> {
        let Some(items) = body.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()
    }

    /// Value of the given metric.
    pub fn metric(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Temperature => self.temperature,
            MetricKind::Humidity => self.humidity,
            MetricKind::OilLevel => self.oil_level,
        }
    }
}

/// Most recent reading for a device, with its open-alert count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawLatestEntry", rename_all = "camelCase")]
pub struct LatestEntry {
    pub device_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub temperature: f64,
    pub humidity: f64,
    pub oil_level: f64,
    pub open_alerts: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLatestEntry {
    #[serde(default)]
    device_id: Value,
    #[serde(default)]
    timestamp: Value,
    #[serde(default)]
    temperature: Value,
    #[serde(default)]
    humidity: Value,
    #[serde(default)]
    oil_level: Value,
    #[serde(default)]
    open_alerts: Value,
}

impl From<RawLatestEntry> for LatestEntry {
    fn from(raw: RawLatestEntry) -> Self {
        Self {
            device_id: normalize_id(&raw.device_id),
            timestamp: normalize_timestamp(&raw.timestamp),
            temperature: normalize_metric(&raw.temperature),
            humidity: normalize_metric(&raw.humidity),
            oil_level: normalize_metric(&raw.oil_level),
            open_alerts: normalize_alert_count(&raw.open_alerts),
        }
    }
}

impl LatestEntry {
    /// Decodes a latest-entry body. Anything but a JSON object is absent.
    pub fn from_value(body: &Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        serde_json::from_value(body.clone()).ok()
    }

    /// The reading part of the entry.
    pub fn sample(&self) -> TelemetrySample {
        TelemetrySample {
            timestamp: self.timestamp,
            temperature: self.temperature,
            humidity: self.humidity,
            oil_level: self.oil_level,
        }
    }
}

/// A device known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: Option<String>,
}

impl From<Value> for DeviceDescriptor {
    fn from(value: Value) -> Self {
        match &value {
            Value::Object(map) => {
                let name = map
                    .get("name")
                    .or_else(|| map.get("deviceName"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let id = ["id", "_id", "deviceId"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(normalize_id))
                    .or_else(|| name.clone())
                    .unwrap_or_default();
                Self { id, name }
            }
            other => {
                let id = normalize_id(other).unwrap_or_default();
                Self {
                    name: Some(id.clone()),
                    id,
                }
            }
        }
    }
}

impl DeviceDescriptor {
    /// Decodes a device-list body. Entries without a usable id are dropped.
    pub fn list_from_value(body: &Value) -> Vec<Self> {
        let Some(items) = body.as_array() else {
            return Vec::new();
        };
        items
            .iter()
            .cloned()
            .map(Self::from)
            .filter(|d| !d.id.is_empty())
            .collect()
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
