// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as URL schemes and non-zero durations.

use crate::diagnostic::ConfigError;
use crate::model::PlantwatchConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PlantwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` must use the http or https scheme"),
        });
    }

    let durations = [
        ("api.timeout_ms", config.api.timeout_ms),
        ("cache.historical_ttl_ms", config.cache.historical_ttl_ms),
        ("cache.realtime_ttl_ms", config.cache.realtime_ttl_ms),
        ("cache.latest_ttl_ms", config.cache.latest_ttl_ms),
        ("cache.device_list_ttl_ms", config.cache.device_list_ttl_ms),
        ("polling.latest_interval_ms", config.polling.latest_interval_ms),
        ("polling.realtime_interval_ms", config.polling.realtime_interval_ms),
        ("polling.historical_interval_ms", config.polling.historical_interval_ms),
    ];
    for (key, value) in durations {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    if config.polling.history_display_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "polling.history_display_limit must be greater than zero".to_string(),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = PlantwatchConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_base_url_fails_validation() {
        let mut config = PlantwatchConfig::default();
        config.api.base_url = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "api.base_url must not be empty"));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let mut config = PlantwatchConfig::default();
        config.api.base_url = "ftp://plant.local/api".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "http or https"));
    }

    #[test]
    fn zero_durations_are_all_reported() {
        let mut config = PlantwatchConfig::default();
        config.api.timeout_ms = 0;
        config.cache.latest_ttl_ms = 0;
        config.polling.historical_interval_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_message(&errors, "api.timeout_ms"));
        assert!(has_message(&errors, "cache.latest_ttl_ms"));
        assert!(has_message(&errors, "polling.historical_interval_ms"));
    }

    #[test]
    fn zero_retries_are_allowed() {
        let mut config = PlantwatchConfig::default();
        config.api.max_retries = 0;
        config.api.retry_delay_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = PlantwatchConfig::default();
        config.logging.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "logging.level"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = PlantwatchConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
