// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order lifecycle tracker.
//!
//! Given an order id, fetches the order, derived progress, and robot
//! snapshot, then re-fetches on a fixed interval until a terminal status
//! is observed or tracking is stopped. The poll loop is a spawned task
//! owning a [`CancellationToken`]; a generation counter guarantees that a
//! late-arriving response from a superseded fetch can never update
//! visible state.
//!
//! Failure policy: the initial fetch surfaces errors (tracking cannot
//! start); errors on subsequent polls are logged and swallowed so a
//! transient outage never tears down an otherwise-live tracking view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use trundle_api::{ApiClient, TrackingResponse};
use trundle_core::{Order, OrderStatus, RobotSnapshot, TrundleError};

use crate::progress::{can_request_transition, progress_for, OrderProgress};

/// The tracker's visible state: the latest applied tracking fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSnapshot {
    pub order: Order,
    pub progress: OrderProgress,
    pub robot: Option<RobotSnapshot>,
    pub estimated_delivery_time: Option<DateTime<Utc>>,
}

impl TrackingSnapshot {
    fn from_response(response: TrackingResponse) -> Self {
        let progress = progress_for(response.order.status);
        Self {
            order: response.order,
            progress,
            robot: response.robot,
            estimated_delivery_time: response.estimated_delivery_time,
        }
    }
}

/// Tracks one order at a time through its lifecycle.
pub struct OrderTracker {
    api: ApiClient,
    poll_interval: Duration,
    tx: watch::Sender<Option<TrackingSnapshot>>,
    /// Monotonic fetch generation. Bumped by every `start_tracking` and
    /// `stop_tracking`; a fetch result is applied only while its
    /// generation is still current.
    generation: Arc<AtomicU64>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl OrderTracker {
    /// Creates a tracker polling at `poll_interval`.
    pub fn new(api: ApiClient, poll_interval: Duration) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            api,
            poll_interval,
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            cancel: Mutex::new(None),
        }
    }

    /// Starts tracking `order_id`.
    ///
    /// Performs the initial fetch immediately; its failure is surfaced and
    /// no polling begins. On success the snapshot is published and, while
    /// the status is non-terminal, a poll loop re-fetches on the fixed
    /// interval. Any previous tracking is superseded.
    pub async fn start_tracking(&self, order_id: &str) -> Result<(), TrundleError> {
        let (generation, cancel) = self.begin();
        let _ = self.tx.send(None);

        let response = match self.api.tracking(order_id).await {
            Ok(response) => response,
            Err(e) => {
                if !self.is_current(generation) {
                    // Superseded mid-fetch; the failure belongs to a
                    // tracking attempt nobody is watching anymore.
                    return Ok(());
                }
                return Err(e);
            }
        };

        if !self.is_current(generation) || cancel.is_cancelled() {
            return Ok(());
        }

        let snapshot = TrackingSnapshot::from_response(response);
        let terminal = snapshot.order.status.is_terminal();
        let _ = self.tx.send(Some(snapshot));

        if terminal {
            debug!(order_id, "order already terminal, no polling");
            return Ok(());
        }

        self.spawn_poll_loop(order_id.to_string(), generation, cancel);
        Ok(())
    }

    /// Stops tracking. Idempotent; a result from any in-flight fetch is
    /// discarded rather than applied.
    pub fn stop_tracking(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(cancel) = self.cancel.lock().unwrap().take() {
            cancel.cancel();
        }
    }

    /// Requests a vendor workflow transition for the tracked order.
    ///
    /// Edges outside {CREATED->PREPARING, PREPARING->READY} are rejected
    /// locally without any network call. On server acceptance the local
    /// projection is refreshed from the authoritative response.
    pub async fn request_transition(
        &self,
        order_id: &str,
        next: OrderStatus,
    ) -> Result<Order, TrundleError> {
        let current = self
            .tx
            .borrow()
            .as_ref()
            .filter(|s| s.order.id == order_id)
            .map(|s| s.order.status)
            .ok_or_else(|| {
                TrundleError::Internal(format!("order {order_id} is not being tracked"))
            })?;

        if !can_request_transition(current, next) {
            return Err(TrundleError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let order = self.api.update_status(order_id, next).await?;

        if self.is_current(generation) {
            self.tx.send_modify(|snapshot| {
                if let Some(snapshot) = snapshot {
                    if snapshot.order.id == order.id {
                        snapshot.progress = progress_for(order.status);
                        snapshot.order = order.clone();
                    }
                }
            });
        }
        Ok(order)
    }

    /// Latest applied snapshot, if any.
    pub fn snapshot(&self) -> Option<TrackingSnapshot> {
        self.tx.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<TrackingSnapshot>> {
        self.tx.subscribe()
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = CancellationToken::new();
        let previous = self.cancel.lock().unwrap().replace(cancel.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        (generation, cancel)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn spawn_poll_loop(&self, order_id: String, generation: u64, cancel: CancellationToken) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        let counter = self.generation.clone();
        let interval = self.poll_interval;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                match api.tracking(&order_id).await {
                    Ok(response) => {
                        if cancel.is_cancelled()
                            || counter.load(Ordering::SeqCst) != generation
                        {
                            // Stale response from a superseded fetch.
                            break;
                        }
                        let snapshot = TrackingSnapshot::from_response(response);
                        let terminal = snapshot.order.status.is_terminal();
                        let _ = tx.send(Some(snapshot));
                        if terminal {
                            debug!(order_id, "terminal status observed, polling stopped");
                            break;
                        }
                    }
                    Err(e) => {
                        if cancel.is_cancelled() {
                            break;
                        }
                        // Transient poll failures keep the previous snapshot visible.
                        warn!(order_id, error = %e, "tracking poll failed");
                    }
                }
            }
        });
    }
}

impl Drop for OrderTracker {
    fn drop(&mut self) {
        self.stop_tracking();
    }
}
