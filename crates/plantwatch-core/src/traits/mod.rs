// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the telemetry access layer and its consumers.

pub mod source;

pub use source::TelemetrySource;
