// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP access to the Plantwatch telemetry backend.
//!
//! [`RetryingClient`] sends [`RequestConfig`]s with a fixed per-attempt
//! timeout and a bounded number of constant-delay retries. The retry counter
//! travels on each request's own config, so concurrent requests never share
//! attempt state.

pub mod client;
pub mod request;

pub use client::RetryingClient;
pub use request::{HttpResponse, RequestConfig};
