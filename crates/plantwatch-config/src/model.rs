// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Plantwatch console.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Plantwatch configuration.
///
/// All sections are optional and default to the values the console ships with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlantwatchConfig {
    /// Backend API endpoint and request policy.
    #[serde(default)]
    pub api: ApiConfig,

    /// Telemetry cache expiry windows.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Device-scoped polling intervals.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the telemetry API, e.g. `http://localhost:5000/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds. Applies to each attempt.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after the first failed attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Constant delay between attempts in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

/// Expiry windows for the telemetry cache, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_historical_ttl_ms")]
    pub historical_ttl_ms: u64,

    #[serde(default = "default_realtime_ttl_ms")]
    pub realtime_ttl_ms: u64,

    #[serde(default = "default_latest_ttl_ms")]
    pub latest_ttl_ms: u64,

    #[serde(default = "default_device_list_ttl_ms")]
    pub device_list_ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            historical_ttl_ms: default_historical_ttl_ms(),
            realtime_ttl_ms: default_realtime_ttl_ms(),
            latest_ttl_ms: default_latest_ttl_ms(),
            device_list_ttl_ms: default_device_list_ttl_ms(),
        }
    }
}

fn default_historical_ttl_ms() -> u64 {
    10_000
}

fn default_realtime_ttl_ms() -> u64 {
    2_000
}

fn default_latest_ttl_ms() -> u64 {
    1_000
}

fn default_device_list_ttl_ms() -> u64 {
    30_000
}

/// Refresh intervals for the selected device, in milliseconds.
///
/// The defaults are staggered so the three reads rarely coincide.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    #[serde(default = "default_latest_interval_ms")]
    pub latest_interval_ms: u64,

    #[serde(default = "default_realtime_interval_ms")]
    pub realtime_interval_ms: u64,

    #[serde(default = "default_historical_interval_ms")]
    pub historical_interval_ms: u64,

    /// Number of historical samples kept for display.
    #[serde(default = "default_history_display_limit")]
    pub history_display_limit: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            latest_interval_ms: default_latest_interval_ms(),
            realtime_interval_ms: default_realtime_interval_ms(),
            historical_interval_ms: default_historical_interval_ms(),
            history_display_limit: default_history_display_limit(),
        }
    }
}

fn default_latest_interval_ms() -> u64 {
    3_000
}

fn default_realtime_interval_ms() -> u64 {
    5_000
}

fn default_historical_interval_ms() -> u64 {
    15_000
}

fn default_history_display_limit() -> usize {
    20
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
