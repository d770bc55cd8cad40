// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-scoped polling.
//!
//! [`DeviceMonitor`] owns the current device selection. Selecting a device
//! starts three independent loops (latest, realtime, historical) under one
//! [`CancellationToken`]; selecting another device or a plant cancels that
//! token before anything new is started. Every update carries the selection
//! epoch it was produced under so consumers can drop late arrivals.

use std::sync::Arc;
use std::time::Duration;

use plantwatch_config::model::PollingConfig;
use plantwatch_core::{DataKind, DeviceId, LatestEntry, TelemetrySample, TelemetrySource};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Refresh cadence of the three polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub latest: Duration,
    pub realtime: Duration,
    pub historical: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            latest: Duration::from_millis(3_000),
            realtime: Duration::from_millis(5_000),
            historical: Duration::from_millis(15_000),
        }
    }
}

impl PollIntervals {
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            latest: Duration::from_millis(config.latest_interval_ms),
            realtime: Duration::from_millis(config.realtime_interval_ms),
            historical: Duration::from_millis(config.historical_interval_ms),
        }
    }

    fn period(&self, kind: PollKind) -> Duration {
        match kind {
            PollKind::Latest => self.latest,
            PollKind::Realtime => self.realtime,
            PollKind::Historical => self.historical,
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    Latest(Option<LatestEntry>),
    Realtime(Vec<TelemetrySample>),
    Historical(Vec<TelemetrySample>),
}

impl UpdatePayload {
    pub fn kind(&self) -> DataKind {
        match self {
            UpdatePayload::Latest(_) => DataKind::Latest,
            UpdatePayload::Realtime(_) => DataKind::Realtime,
            UpdatePayload::Historical(_) => DataKind::Historical,
        }
    }
}

/// A poll result tagged with the selection it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryUpdate {
    pub device_id: DeviceId,
    pub epoch: u64,
    pub payload: UpdatePayload,
}

struct Selection {
    device_id: DeviceId,
    token: CancellationToken,
}

/// Polls the selected device and forwards results on a channel.
pub struct DeviceMonitor {
    source: Arc<dyn TelemetrySource>,
    intervals: PollIntervals,
    updates: mpsc::Sender<TelemetryUpdate>,
    tracker: TaskTracker,
    selection: Option<Selection>,
    epoch: u64,
}

impl DeviceMonitor {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        intervals: PollIntervals,
        updates: mpsc::Sender<TelemetryUpdate>,
    ) -> Self {
        Self {
            source,
            intervals,
            updates,
            tracker: TaskTracker::new(),
            selection: None,
            epoch: 0,
        }
    }

    /// Epoch of the current selection. Bumped by every selection change.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current_device(&self) -> Option<&DeviceId> {
        self.selection.as_ref().map(|s| &s.device_id)
    }

    /// Number of polling loops still running, cancelled ones included until
    /// they exit.
    pub fn active_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Switches polling to `device_id` and returns the new epoch.
    ///
    /// The previous device's loops are cancelled first. The new device's
    /// cache entries are dropped so its first poll reads live data.
    pub fn select_device(&mut self, device_id: DeviceId) -> u64 {
        self.stop();
        self.source.invalidate(device_id.as_str());
        self.epoch += 1;
        info!(device_id = %device_id, epoch = self.epoch, "device selected");

        let token = CancellationToken::new();
        for kind in PollKind::ALL {
            let period = self.intervals.period(kind);
            let poller = Poller {
                source: Arc::clone(&self.source),
                device_id: device_id.clone(),
                epoch: self.epoch,
                kind,
                updates: self.updates.clone(),
                token: token.clone(),
            };
            self.tracker.spawn(poller.run(period));
        }

        self.selection = Some(Selection { device_id, token });
        self.epoch
    }

    /// A plant switch: stops polling and drops every cached entry.
    pub fn select_plant(&mut self) -> u64 {
        self.stop();
        self.source.invalidate_all();
        self.epoch += 1;
        info!(epoch = self.epoch, "plant selected, polling stopped");
        self.epoch
    }

    /// Cancels the current selection's loops without waiting for them.
    pub fn stop(&mut self) {
        if let Some(selection) = self.selection.take() {
            selection.token.cancel();
            debug!(device_id = %selection.device_id, "polling cancelled");
        }
    }

    /// Cancels polling and waits until every loop has exited.
    pub async fn shutdown(&mut self) {
        self.stop();
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
        debug!("device monitor stopped");
    }
}

impl Drop for DeviceMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The per-device reads a selection polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollKind {
    Latest,
    Realtime,
    Historical,
}

impl PollKind {
    const ALL: [PollKind; 3] = [PollKind::Latest, PollKind::Realtime, PollKind::Historical];

    fn data_kind(self) -> DataKind {
        match self {
            PollKind::Latest => DataKind::Latest,
            PollKind::Realtime => DataKind::Realtime,
            PollKind::Historical => DataKind::Historical,
        }
    }
}

struct Poller {
    source: Arc<dyn TelemetrySource>,
    device_id: DeviceId,
    epoch: u64,
    kind: PollKind,
    updates: mpsc::Sender<TelemetryUpdate>,
    token: CancellationToken,
}

impl Poller {
    /// Polls every `period`, starting immediately, until cancelled or the
    /// receiver is gone.
    async fn run(self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            // Dropping the in-flight read on cancel also drops its cache write.
            let payload = tokio::select! {
                _ = self.token.cancelled() => break,
                payload = self.poll() => payload,
            };

            let update = TelemetryUpdate {
                device_id: self.device_id.clone(),
                epoch: self.epoch,
                payload,
            };
            tokio::select! {
                _ = self.token.cancelled() => break,
                sent = self.updates.send(update) => {
                    if sent.is_err() {
                        debug!(device_id = %self.device_id, kind = %self.kind.data_kind(), "update receiver closed");
                        break;
                    }
                }
            }
        }
    }

    async fn poll(&self) -> UpdatePayload {
        let device_id = self.device_id.as_str();
        match self.kind {
            PollKind::Latest => UpdatePayload::Latest(self.source.latest(device_id).await),
            PollKind::Realtime => UpdatePayload::Realtime(self.source.realtime(device_id).await),
            PollKind::Historical => {
                UpdatePayload::Historical(self.source.historical(device_id).await)
            }
        }
    }
}
