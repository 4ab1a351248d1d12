// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed authorization event bus.
//!
//! Replaces an ambient process-wide "logged out" signal with an explicit
//! message-passing channel: every authorized-call wrapper publishes a
//! [`SessionInvalidated`](AuthEventKind::SessionInvalidated) event when a
//! service answers with a 401-class status, and the session manager is the
//! sole subscriber responsible for clearing session state in response.
//! Transport-layer auth failures stay decoupled from session state this way.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Default buffered capacity of the broadcast channel.
const DEFAULT_CAPACITY: usize = 16;

/// Kinds of authorization events carried on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEventKind {
    /// A service rejected the current credential. Carries the HTTP status
    /// and the verbatim service message for diagnostics.
    SessionInvalidated { status: u16, message: String },
}

/// An authorization event with its envelope metadata.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: AuthEventKind,
}

/// Broadcast bus for authorization events.
///
/// Cloning the bus is cheap; all clones publish into the same channel.
/// Subscribers created after an event was published do not see it.
#[derive(Debug, Clone)]
pub struct AuthBus {
    tx: broadcast::Sender<AuthEvent>,
}

impl Default for AuthBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthBus {
    /// Creates a bus with the given buffered capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Publishes a session-invalidated event.
    ///
    /// Publishing with no live subscribers is not an error; the event is
    /// simply dropped.
    pub fn publish_session_invalidated(&self, status: u16, message: impl Into<String>) {
        let event = AuthEvent {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            kind: AuthEventKind::SessionInvalidated {
                status,
                message: message.into(),
            },
        };
        let receivers = self.tx.receiver_count();
        debug!(status, receivers, "publishing session-invalidated event");
        let _ = self.tx.send(event);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
