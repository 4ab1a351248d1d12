// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live robot fleet telemetry for the Trundle delivery client.
//!
//! One persistent SSE subscription feeds a watch-published fleet snapshot;
//! transport drops self-heal through a fixed-delay reconnect loop. The
//! crate also carries the operator-side stop command, which goes out over
//! plain HTTP and deliberately never touches the local snapshot.

pub mod client;
pub mod stream;

pub use client::{ConnectionState, FleetClient, FleetNotice, FleetState};
pub use stream::{parse_frame, TELEMETRY_EVENT};
