// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! View state for the selected device.

use plantwatch_config::model::PollingConfig;
use plantwatch_core::{DeviceId, LatestEntry, TelemetrySample};
use tracing::debug;

use crate::monitor::{TelemetryUpdate, UpdatePayload};

/// One headline figure shown for the selected device.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTile {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl std::fmt::Display for MetricTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}{}", self.label, self.value, self.unit)
    }
}

/// What the console shows for the current selection.
///
/// Updates from any other device or selection epoch are ignored, so results
/// that were in flight across a device switch never reach the views.
#[derive(Debug, Clone)]
pub struct DashboardState {
    device_id: Option<DeviceId>,
    epoch: u64,
    history_limit: usize,
    latest: Option<LatestEntry>,
    realtime: Vec<TelemetrySample>,
    historical: Vec<TelemetrySample>,
}

impl DashboardState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            device_id: None,
            epoch: 0,
            history_limit,
            latest: None,
            realtime: Vec::new(),
            historical: Vec::new(),
        }
    }

    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(config.history_display_limit)
    }

    /// Switches to a new selection and clears every view.
    pub fn select(&mut self, device_id: Option<DeviceId>, epoch: u64) {
        self.device_id = device_id;
        self.epoch = epoch;
        self.latest = None;
        self.realtime.clear();
        self.historical.clear();
    }

    /// Applies `update` if it belongs to the current selection. Returns
    /// whether it was applied.
    pub fn apply(&mut self, update: TelemetryUpdate) -> bool {
        if update.epoch != self.epoch || self.device_id.as_ref() != Some(&update.device_id) {
            debug!(
                device_id = %update.device_id,
                epoch = update.epoch,
                current_epoch = self.epoch,
                "discarding stale update"
            );
            return false;
        }

        match update.payload {
            UpdatePayload::Latest(entry) => self.latest = entry,
            UpdatePayload::Realtime(samples) => self.realtime = samples,
            UpdatePayload::Historical(mut samples) => {
                // An empty poll keeps the history already on screen.
                if !samples.is_empty() {
                    samples.truncate(self.history_limit);
                    self.historical = samples;
                }
            }
        }
        true
    }

    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn latest(&self) -> Option<&LatestEntry> {
        self.latest.as_ref()
    }

    pub fn realtime(&self) -> &[TelemetrySample] {
        &self.realtime
    }

    pub fn historical(&self) -> &[TelemetrySample] {
        &self.historical
    }

    /// Open alerts, temperature, humidity and oil level from the latest
    /// entry. Zero while no entry is known.
    pub fn tiles(&self) -> [MetricTile; 4] {
        let latest = self.latest.clone().unwrap_or_default();
        [
            MetricTile {
                label: "Open Alerts",
                value: f64::from(latest.open_alerts),
                unit: "",
            },
            MetricTile {
                label: "Temperature",
                value: latest.temperature,
                unit: "°C",
            },
            MetricTile {
                label: "Humidity",
                value: latest.humidity,
                unit: "%",
            },
            MetricTile {
                label: "Oil Level",
                value: latest.oil_level,
                unit: "%",
            },
        ]
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(device: &str, epoch: u64, payload: UpdatePayload) -> TelemetryUpdate {
        TelemetryUpdate {
            device_id: DeviceId::from(device),
            epoch,
            payload,
        }
    }

    fn series(len: usize) -> Vec<TelemetrySample> {
        (0..len)
            .map(|i| TelemetrySample {
                temperature: i as f64,
                ..Default::default()
            })
            .collect()
    }

    fn selected(device: &str, epoch: u64) -> DashboardState {
        let mut state = DashboardState::default();
        state.select(Some(DeviceId::from(device)), epoch);
        state
    }

    #[test]
    fn historical_is_truncated_to_display_limit() {
        let mut state = selected("dev-1", 1);
        assert!(state.apply(update("dev-1", 1, UpdatePayload::Historical(series(50)))));
        assert_eq!(state.historical().len(), 20);
        assert_eq!(state.historical()[0].temperature, 0.0);
        assert_eq!(state.historical()[19].temperature, 19.0);
    }

    #[test]
    fn empty_historical_poll_keeps_previous_history() {
        let mut state = selected("dev-1", 1);
        state.apply(update("dev-1", 1, UpdatePayload::Historical(series(5))));
        state.apply(update("dev-1", 1, UpdatePayload::Historical(Vec::new())));
        assert_eq!(state.historical().len(), 5);
    }

    #[test]
    fn empty_realtime_poll_replaces_window() {
        let mut state = selected("dev-1", 1);
        state.apply(update("dev-1", 1, UpdatePayload::Realtime(series(3))));
        state.apply(update("dev-1", 1, UpdatePayload::Realtime(Vec::new())));
        assert!(state.realtime().is_empty());
    }

    #[test]
    fn updates_from_previous_selection_are_discarded() {
        let mut state = selected("dev-1", 1);
        state.select(Some(DeviceId::from("dev-2")), 2);

        let late = update(
            "dev-1",
            1,
            UpdatePayload::Latest(Some(LatestEntry {
                temperature: 99.0,
                ..Default::default()
            })),
        );
        assert!(!state.apply(late));
        assert!(state.latest().is_none());
    }

    #[test]
    fn same_device_with_old_epoch_is_discarded() {
        let mut state = selected("dev-1", 3);
        assert!(!state.apply(update("dev-1", 2, UpdatePayload::Realtime(series(1)))));
        assert!(state.realtime().is_empty());
    }

    #[test]
    fn no_selection_accepts_nothing() {
        let mut state = DashboardState::default();
        assert!(!state.apply(update("dev-1", 0, UpdatePayload::Realtime(series(1)))));
    }

    #[test]
    fn select_clears_views() {
        let mut state = selected("dev-1", 1);
        state.apply(update("dev-1", 1, UpdatePayload::Realtime(series(2))));
        state.apply(update("dev-1", 1, UpdatePayload::Historical(series(2))));
        state.apply(update("dev-1", 1, UpdatePayload::Latest(Some(LatestEntry::default()))));

        state.select(Some(DeviceId::from("dev-2")), 2);
        assert!(state.latest().is_none());
        assert!(state.realtime().is_empty());
        assert!(state.historical().is_empty());
        assert_eq!(state.epoch(), 2);
    }

    #[test]
    fn tiles_reflect_latest_entry() {
        let mut state = selected("dev-1", 1);
        state.apply(update(
            "dev-1",
            1,
            UpdatePayload::Latest(Some(LatestEntry {
                temperature: 20.0,
                humidity: 55.0,
                oil_level: 80.0,
                open_alerts: 2,
                ..Default::default()
            })),
        ));

        let tiles = state.tiles();
        let values: Vec<f64> = tiles.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![2.0, 20.0, 55.0, 80.0]);
        assert_eq!(tiles[1].to_string(), "Temperature: 20°C");
    }

    #[test]
    fn tiles_are_zero_without_latest_entry() {
        let state = selected("dev-1", 1);
        assert!(state.tiles().iter().all(|t| t.value == 0.0));
    }
}
