// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock telemetry source for deterministic polling tests.
//!
//! `MockTelemetrySource` implements `TelemetrySource` from scripted per-device
//! data and records every call, so tests can assert which device was polled
//! and when caches were invalidated.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use plantwatch_core::{DataKind, DeviceDescriptor, LatestEntry, TelemetrySample, TelemetrySource};

/// One recorded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCall {
    pub kind: DataKind,
    /// Empty for device-list reads.
    pub device_id: String,
}

#[derive(Debug, Default)]
struct State {
    historical: HashMap<String, Vec<TelemetrySample>>,
    realtime: HashMap<String, Vec<TelemetrySample>>,
    latest: HashMap<String, LatestEntry>,
    devices: Vec<DeviceDescriptor>,
    calls: Vec<SourceCall>,
    invalidated: Vec<String>,
    invalidate_all_count: usize,
}

/// A telemetry source that serves scripted data.
///
/// Devices without scripted data read as empty series and an absent latest
/// entry, matching what the real service returns on failure.
#[derive(Debug, Clone, Default)]
pub struct MockTelemetrySource {
    state: Arc<Mutex<State>>,
}

impl MockTelemetrySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_historical(&self, device_id: &str, samples: Vec<TelemetrySample>) {
        self.state().historical.insert(device_id.to_string(), samples);
    }

    pub fn set_realtime(&self, device_id: &str, samples: Vec<TelemetrySample>) {
        self.state().realtime.insert(device_id.to_string(), samples);
    }

    pub fn set_latest(&self, device_id: &str, entry: LatestEntry) {
        self.state().latest.insert(device_id.to_string(), entry);
    }

    pub fn set_devices(&self, devices: Vec<DeviceDescriptor>) {
        self.state().devices = devices;
    }

    /// Every read so far, in call order.
    pub fn calls(&self) -> Vec<SourceCall> {
        self.state().calls.clone()
    }

    /// Number of reads of `kind` for `device_id`.
    pub fn call_count(&self, kind: DataKind, device_id: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.kind == kind && c.device_id == device_id)
            .count()
    }

    /// Number of reads of any kind for `device_id`.
    pub fn device_call_count(&self, device_id: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.device_id == device_id)
            .count()
    }

    /// Devices passed to `invalidate`, in call order.
    pub fn invalidated(&self) -> Vec<String> {
        self.state().invalidated.clone()
    }

    pub fn invalidate_all_count(&self) -> usize {
        self.state().invalidate_all_count
    }

    fn record(&self, kind: DataKind, device_id: &str) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.calls.push(SourceCall {
            kind,
            device_id: device_id.to_string(),
        });
        state
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TelemetrySource for MockTelemetrySource {
    async fn historical(&self, device_id: &str) -> Vec<TelemetrySample> {
        let state = self.record(DataKind::Historical, device_id);
        state.historical.get(device_id).cloned().unwrap_or_default()
    }

    async fn realtime(&self, device_id: &str) -> Vec<TelemetrySample> {
        let state = self.record(DataKind::Realtime, device_id);
        state.realtime.get(device_id).cloned().unwrap_or_default()
    }

    async fn latest(&self, device_id: &str) -> Option<LatestEntry> {
        let state = self.record(DataKind::Latest, device_id);
        state.latest.get(device_id).cloned()
    }

    async fn device_list(&self) -> Vec<DeviceDescriptor> {
        let state = self.record(DataKind::DeviceList, "");
        state.devices.clone()
    }

    fn invalidate(&self, device_id: &str) {
        self.state().invalidated.push(device_id.to_string());
    }

    fn invalidate_all(&self) {
        self.state().invalidate_all_count += 1;
    }
}
