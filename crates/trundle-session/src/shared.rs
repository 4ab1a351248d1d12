// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The shared read-only session snapshot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use trundle_core::{Session, TokenProvider};

/// Process-wide handle to the current session.
///
/// The session is the only state read by multiple components. It is
/// treated as effectively immutable between updates: readers get an
/// `Arc<Session>` snapshot and never mutate it; the session manager swaps
/// it wholesale on login/logout/invalidation. Consumers re-read after a
/// session-invalidated event rather than caching past it.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<ArcSwapOption<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session snapshot, or `None` when logged out.
    pub fn get(&self) -> Option<Arc<Session>> {
        self.inner.load_full()
    }

    pub(crate) fn set(&self, session: Session) {
        self.inner.store(Some(Arc::new(session)));
    }

    pub(crate) fn clear(&self) {
        self.inner.store(None);
    }
}

impl TokenProvider for SharedSession {
    fn token(&self) -> Option<String> {
        self.get().map(|s| s.token.clone())
    }
}
