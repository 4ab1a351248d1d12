// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Trundle delivery client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Trundle configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values for a local development stack.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrundleConfig {
    /// Catalog/order and session service settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Telemetry stream settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Order tracking poll settings.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Durable client storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Catalog/order and session service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the catalog/order/session REST services.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Telemetry stream settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Base URL of the telemetry service.
    #[serde(default = "default_telemetry_base_url")]
    pub base_url: String,

    /// Delay before a reconnect attempt after the stream drops, in seconds.
    /// Fixed -- there is no backoff growth and no retry cap.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: default_telemetry_base_url(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

fn default_telemetry_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_reconnect_delay_secs() -> u64 {
    2
}

/// Order tracking poll settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackingConfig {
    /// Interval between tracking re-fetches while the order is live, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    10
}

/// Durable client storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding persisted client state.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "trundle.db".to_string()
}
