// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read side of the telemetry access layer, as seen by polling loops.

use async_trait::async_trait;

use crate::types::{DeviceDescriptor, LatestEntry, TelemetrySample};

/// Source of per-device telemetry reads.
///
/// Implementations never fail: a terminal fetch failure is reported as the
/// safe default (empty series, absent entry, empty device list).
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Most recent samples for the device.
    async fn historical(&self, device_id: &str) -> Vec<TelemetrySample>;

    /// Short look-back window of samples for the device.
    async fn realtime(&self, device_id: &str) -> Vec<TelemetrySample>;

    /// Single most recent entry for the device, if any.
    async fn latest(&self, device_id: &str) -> Option<LatestEntry>;

    /// All devices known to the backend.
    async fn device_list(&self) -> Vec<DeviceDescriptor>;

    /// Drops cached data for one device so its next read is a live fetch.
    fn invalidate(&self, device_id: &str);

    /// Drops all cached data.
    fn invalidate_all(&self);
}
