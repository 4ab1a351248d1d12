// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage trait for the durable client key-value store.

use async_trait::async_trait;

use crate::error::TrundleError;

/// Well-known storage keys.
///
/// Ownership discipline: each key is written by exactly one component --
/// the cart store owns [`CART`](keys::CART), the session manager owns the
/// session keys. No component writes another's key.
pub mod keys {
    /// Full cart snapshot, owned by the cart store.
    pub const CART: &str = "cart";
    /// Opaque session token, owned by the session manager.
    pub const SESSION_TOKEN: &str = "session.token";
    /// Cached user object, owned by the session manager.
    pub const SESSION_USER: &str = "session.user";
}

/// Durable key-value persistence surviving process restarts.
///
/// Values are opaque strings (JSON snapshots in practice). Implementations
/// must make `put` durable before returning so that a crash immediately
/// after an acknowledged mutation loses nothing.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Reads the value for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, TrundleError>;

    /// Durably writes `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), TrundleError>;

    /// Removes `key` if present. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), TrundleError>;
}
