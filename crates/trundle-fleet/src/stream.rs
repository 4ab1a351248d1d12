// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telemetry frame decoding.
//!
//! The telemetry service pushes named `telemetry` SSE events whose payload
//! is the complete fleet state at that instant: an ordered sequence of
//! robot snapshots. A frame is never a partial update.

use trundle_core::{RobotSnapshot, TrundleError};

/// SSE event name carrying a fleet frame. Other event names (keep-alives,
/// future additions) are ignored.
pub const TELEMETRY_EVENT: &str = "telemetry";

/// Parses one telemetry frame payload into the full fleet snapshot.
pub fn parse_frame(data: &str) -> Result<Vec<RobotSnapshot>, TrundleError> {
    serde_json::from_str(data).map_err(|e| TrundleError::Malformed {
        message: format!("failed to parse telemetry frame: {e}"),
    })
}
