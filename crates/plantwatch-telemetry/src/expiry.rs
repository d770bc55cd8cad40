// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expiry windows per cached data kind.

use std::time::Duration;

use plantwatch_config::model::CacheConfig;
use plantwatch_core::DataKind;

/// Maximum age of a cached value before the next read refreshes it.
///
/// Fixed for the lifetime of a [`TelemetryService`](crate::TelemetryService);
/// callers cannot override it per read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub historical: Duration,
    pub realtime: Duration,
    pub latest: Duration,
    pub device_list: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            historical: Duration::from_millis(10_000),
            realtime: Duration::from_millis(2_000),
            latest: Duration::from_millis(1_000),
            device_list: Duration::from_millis(30_000),
        }
    }
}

impl ExpiryPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            historical: Duration::from_millis(config.historical_ttl_ms),
            realtime: Duration::from_millis(config.realtime_ttl_ms),
            latest: Duration::from_millis(config.latest_ttl_ms),
            device_list: Duration::from_millis(config.device_list_ttl_ms),
        }
    }

    pub fn ttl(&self, kind: DataKind) -> Duration {
        match kind {
            DataKind::Historical => self.historical,
            DataKind::Realtime => self.realtime,
            DataKind::Latest => self.latest,
            DataKind::DeviceList => self.device_list,
        }
    }
}
