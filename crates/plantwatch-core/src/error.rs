// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Plantwatch telemetry console.

use thiserror::Error;

/// The primary error type used across the Plantwatch crates.
#[derive(Debug, Error)]
pub enum PlantwatchError {
    /// Configuration errors (invalid base URL, unusable client settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend HTTP errors (connection failure, non-2xx status).
    #[error("http error: {message}")]
    Http {
        message: String,
        /// Status code when the backend answered, `None` on transport failure.
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request exceeded the per-request timeout.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Response body could not be decoded as JSON.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PlantwatchError {
    /// Returns the HTTP status carried by an [`Http`](Self::Http) error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the failure is eligible for another attempt.
    ///
    /// Transport failures, non-2xx statuses and timeouts are retryable.
    /// Decode and configuration problems would fail identically again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Timeout { .. })
    }
}
