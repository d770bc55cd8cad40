// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plantwatch integration tests.
//!
//! Provides a scripted telemetry source and a mock backend so polling and
//! cache behavior can be tested without a live telemetry API.
//!
//! # Components
//!
//! - [`MockTelemetrySource`] - In-memory [`TelemetrySource`](plantwatch_core::TelemetrySource) with call recording
//! - [`TestBackend`] - `wiremock` server speaking the telemetry REST paths

pub mod backend;
pub mod mock_source;

pub use backend::TestBackend;
pub use mock_source::{MockTelemetrySource, SourceCall};
