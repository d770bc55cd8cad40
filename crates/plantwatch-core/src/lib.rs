// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Plantwatch telemetry console.
//!
//! This crate provides the error type, the canonical telemetry types with
//! their boundary normalization, and the [`TelemetrySource`] trait that the
//! polling layer consumes.

pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PlantwatchError;
pub use traits::TelemetrySource;
pub use types::{
    DataKind, DeviceDescriptor, DeviceId, LatestEntry, MetricKind, TelemetrySample,
};
