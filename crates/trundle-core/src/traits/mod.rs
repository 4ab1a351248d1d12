// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions implemented by Trundle backends.

pub mod auth;
pub mod store;

pub use auth::{StaticToken, TokenProvider};
pub use store::StateStore;
