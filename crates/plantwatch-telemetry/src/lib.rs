// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry access layer for the Plantwatch console.
//!
//! Wraps the retrying backend client with a per-device cache whose entries
//! expire per data kind, and drives device-scoped polling whose results feed
//! the dashboard view state.

pub mod cache;
pub mod dashboard;
pub mod expiry;
pub mod monitor;
pub mod service;

pub use cache::TelemetryCache;
pub use dashboard::{DashboardState, MetricTile};
pub use expiry::ExpiryPolicy;
pub use monitor::{DeviceMonitor, PollIntervals, TelemetryUpdate, UpdatePayload};
pub use service::TelemetryService;
