// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./trundle.toml` > `~/.config/trundle/trundle.toml`
//! with environment variable overrides via `TRUNDLE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TrundleConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/trundle/trundle.toml` (user XDG config)
/// 3. `./trundle.toml` (local directory)
/// 4. `TRUNDLE_*` environment variables
pub fn load_config() -> Result<TrundleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrundleConfig::default()))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("trundle/trundle.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("trundle.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TrundleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrundleConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TrundleConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TrundleConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TRUNDLE_API_BASE_URL` must map to
/// `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("TRUNDLE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("telemetry_", "telemetry.", 1)
            .replacen("tracking_", "tracking.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
