// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory telemetry cache tables.
//!
//! Three per-device tables (historical, realtime, latest) and one shared
//! device-list slot. Every slot holds a [`CacheEntry`] whose value and fetch
//! time are written together, so a reader never sees one without the other.
//!
//! Invalidation bumps a generation counter. A refresh takes a [`FetchTicket`]
//! before it suspends on the network and only stores its result if the
//! ticket is still current, so data fetched for a device before it was
//! invalidated cannot repopulate the cache afterwards.

use std::collections::HashMap;
use std::time::Duration;

use plantwatch_core::{DataKind, DeviceDescriptor, LatestEntry, TelemetrySample};
use tokio::time::Instant;

/// A cached value together with the time it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    /// Fresh while no more than `ttl` has elapsed since the fetch.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) <= ttl
    }
}

/// Per-device series tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Historical,
    Realtime,
}

impl SeriesKind {
    pub fn data_kind(self) -> DataKind {
        match self {
            SeriesKind::Historical => DataKind::Historical,
            SeriesKind::Realtime => DataKind::Realtime,
        }
    }
}

/// Cache state observed when a refresh started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    generation: u64,
}

/// The four cache tables plus invalidation bookkeeping.
#[derive(Debug, Default)]
pub struct TelemetryCache {
    historical: HashMap<String, CacheEntry<Vec<TelemetrySample>>>,
    realtime: HashMap<String, CacheEntry<Vec<TelemetrySample>>>,
    latest: HashMap<String, CacheEntry<LatestEntry>>,
    device_list: Option<CacheEntry<Vec<DeviceDescriptor>>>,
    /// Bumped by [`clear`](Self::clear).
    epoch: u64,
    /// Bumped per device by [`invalidate_device`](Self::invalidate_device),
    /// cached or not, so a first fetch still in flight is rejected. Holds one
    /// counter per invalidated device id of the current plant; emptied by
    /// [`clear`](Self::clear).
    generations: HashMap<String, u64>,
}

impl TelemetryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for a per-device refresh.
    pub fn ticket(&self, device_id: &str) -> FetchTicket {
        FetchTicket {
            epoch: self.epoch,
            generation: self.generations.get(device_id).copied().unwrap_or(0),
        }
    }

    /// Ticket for a device-list refresh.
    pub fn list_ticket(&self) -> FetchTicket {
        FetchTicket {
            epoch: self.epoch,
            generation: 0,
        }
    }

    pub fn fresh_series(
        &self,
        kind: SeriesKind,
        device_id: &str,
        now: Instant,
        ttl: Duration,
    ) -> Option<Vec<TelemetrySample>> {
        self.series_table(kind)
            .get(device_id)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn fresh_latest(&self, device_id: &str, now: Instant, ttl: Duration) -> Option<LatestEntry> {
        self.latest
            .get(device_id)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn fresh_device_list(&self, now: Instant, ttl: Duration) -> Option<Vec<DeviceDescriptor>> {
        self.device_list
            .as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value.clone())
    }

    /// Replaces a series slot. Returns `false` if the ticket went stale.
    pub fn store_series(
        &mut self,
        kind: SeriesKind,
        device_id: &str,
        value: Vec<TelemetrySample>,
        fetched_at: Instant,
        ticket: FetchTicket,
    ) -> bool {
        if ticket != self.ticket(device_id) {
            return false;
        }
        self.series_table_mut(kind)
            .insert(device_id.to_string(), CacheEntry::new(value, fetched_at));
        true
    }

    /// Replaces the latest-entry slot. An absent entry empties the slot, so
    /// the next read asks the backend again.
    pub fn store_latest(
        &mut self,
        device_id: &str,
        value: Option<LatestEntry>,
        fetched_at: Instant,
        ticket: FetchTicket,
    ) -> bool {
        if ticket != self.ticket(device_id) {
            return false;
        }
        match value {
            Some(entry) => {
                self.latest
                    .insert(device_id.to_string(), CacheEntry::new(entry, fetched_at));
            }
            None => {
                self.latest.remove(device_id);
            }
        }
        true
    }

    pub fn store_device_list(
        &mut self,
        value: Vec<DeviceDescriptor>,
        fetched_at: Instant,
        ticket: FetchTicket,
    ) -> bool {
        if ticket != self.list_ticket() {
            return false;
        }
        self.device_list = Some(CacheEntry::new(value, fetched_at));
        true
    }

    /// Fetch time of a slot, if populated. `device_id` is ignored for the
    /// device list.
    pub fn fetched_at(&self, kind: DataKind, device_id: &str) -> Option<Instant> {
        match kind {
            DataKind::Historical => self.historical.get(device_id).map(|e| e.fetched_at),
            DataKind::Realtime => self.realtime.get(device_id).map(|e| e.fetched_at),
            DataKind::Latest => self.latest.get(device_id).map(|e| e.fetched_at),
            DataKind::DeviceList => self.device_list.as_ref().map(|e| e.fetched_at),
        }
    }

    /// Drops the three per-device slots for `device_id`. The device list
    /// and other devices are untouched.
    pub fn invalidate_device(&mut self, device_id: &str) {
        self.historical.remove(device_id);
        self.realtime.remove(device_id);
        self.latest.remove(device_id);
        *self.generations.entry(device_id.to_string()).or_insert(0) += 1;
    }

    /// Resets all four tables to the empty initial state.
    pub fn clear(&mut self) {
        self.historical.clear();
        self.realtime.clear();
        self.latest.clear();
        self.device_list = None;
        self.generations.clear();
        self.epoch += 1;
    }

    /// Whether every table is empty.
    pub fn is_empty(&self) -> bool {
        self.historical.is_empty()
            && self.realtime.is_empty()
            && self.latest.is_empty()
            && self.device_list.is_none()
    }

    fn series_table(&self, kind: SeriesKind) -> &HashMap<String, CacheEntry<Vec<TelemetrySample>>> {
        match kind {
            SeriesKind::Historical => &self.historical,
            SeriesKind::Realtime => &self.realtime,
        }
    }

    fn series_table_mut(
        &mut self,
        kind: SeriesKind,
    ) -> &mut HashMap<String, CacheEntry<Vec<TelemetrySample>>> {
        match kind {
            SeriesKind::Historical => &mut self.historical,
            SeriesKind::Realtime => &mut self.realtime,
        }
    }
}
