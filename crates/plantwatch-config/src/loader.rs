// SPDX-FileCopyrightText: 2026 Plantwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plantwatch.toml` > `~/.config/plantwatch/plantwatch.toml`
//! > `/etc/plantwatch/plantwatch.toml`, with environment variable overrides via
//! the `PLANTWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlantwatchConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plantwatch/plantwatch.toml`
/// 3. `~/.config/plantwatch/plantwatch.toml`
/// 4. `./plantwatch.toml`
/// 5. `PLANTWATCH_*` environment variables
pub fn load_config() -> Result<PlantwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PlantwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlantwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlantwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlantwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG lookup, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlantwatchConfig::default()))
        .merge(Toml::file("/etc/plantwatch/plantwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("plantwatch/plantwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("plantwatch.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `PLANTWATCH_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `PLANTWATCH_API_BASE_URL` must map to `api.base_url`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PLANTWATCH_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str)
            .into()
    })
}

/// Top-level config sections addressable from the environment.
const SECTIONS: [&str; 4] = ["api", "cache", "polling", "logging"];
