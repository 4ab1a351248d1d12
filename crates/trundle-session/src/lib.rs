// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle for the Trundle delivery client.
//!
//! Provides the [`SessionManager`] (startup revalidation, login, register,
//! local logout, bus-driven invalidation) and the [`SharedSession`] handle
//! other components use to read the current credential.

pub mod manager;
pub mod shared;

pub use manager::{SessionManager, SessionPhase};
pub use shared::SharedSession;
