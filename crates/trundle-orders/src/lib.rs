// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order lifecycle tracking for the Trundle delivery client.
//!
//! A single-order poll loop keeps a watch-published tracking snapshot
//! current, and a fixed progress table maps lifecycle status to what the
//! UI renders. Client-requested transitions are validated locally before
//! any network call goes out.

pub mod progress;
pub mod tracker;

pub use progress::{can_request_transition, progress_for, OrderProgress};
pub use tracker::{OrderTracker, TrackingSnapshot};
