// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential seam between the session manager and authorized callers.

/// Read-only access to the current bearer credential.
///
/// Implemented by the session manager; consumed by every component that
/// issues authorized requests. Callers read the token at request time and
/// never cache it past a session-invalidated event.
pub trait TokenProvider: Send + Sync {
    /// The current session token, or `None` when no session is live.
    fn token(&self) -> Option<String>;
}

/// A fixed token, for tests and single-shot tools.
#[derive(Debug, Clone)]
pub struct StaticToken(pub Option<String>);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}
