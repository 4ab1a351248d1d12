// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cart store with single-restaurant consistency.
//!
//! The cart holds the pending order's line items, all bound to one
//! restaurant. Adding an item from a different restaurant is a conflicting
//! add resolved through an explicit two-phase API: [`CartStore::add_item`]
//! returns [`AddOutcome::Conflict`] and parks the incoming line until the
//! caller settles it with [`CartStore::resolve_conflict`]. Every mutation
//! persists the full snapshot to durable storage before returning, so a
//! reload loses nothing already acknowledged.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use trundle_core::{keys, CartLine, CartSnapshot, MenuItemRef, StateStore, TrundleError};

/// Result of an [`CartStore::add_item`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The line was added (or merged into an existing line) and persisted.
    Added,
    /// The cart is bound to a different restaurant. The incoming line is
    /// parked; nothing was mutated or persisted. The caller must follow up
    /// with [`CartStore::resolve_conflict`].
    Conflict {
        /// Restaurant the cart is currently bound to.
        current_restaurant_id: String,
        /// Restaurant of the incoming item.
        incoming_restaurant_id: String,
    },
}

/// A conflicting add awaiting the caller's decision.
#[derive(Debug, Clone)]
struct PendingAdd {
    item: MenuItemRef,
    restaurant_id: String,
    quantity: u32,
}

struct Inner {
    snapshot: CartSnapshot,
    pending: Option<PendingAdd>,
}

/// The cart store.
///
/// Interior state is guarded by one async mutex so a mutation and its
/// persistence commit atomically with respect to other callers.
pub struct CartStore {
    store: Arc<dyn StateStore>,
    inner: Mutex<Inner>,
    tx: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Loads the cart from durable storage.
    ///
    /// Malformed or unreadable persisted data is discarded silently and
    /// the cart starts empty -- a damaged cart snapshot is never fatal.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let snapshot = match store.get(keys::CART).await {
            Ok(Some(raw)) => match serde_json::from_str::<CartSnapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    debug!(error = %e, "discarding malformed persisted cart");
                    CartSnapshot::default()
                }
            },
            Ok(None) => CartSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "cart storage unreadable, starting empty");
                CartSnapshot::default()
            }
        };

        let (tx, _) = watch::channel(snapshot.clone());
        Self {
            store,
            inner: Mutex::new(Inner {
                snapshot,
                pending: None,
            }),
            tx,
        }
    }

    /// Adds `quantity` of `item` from `restaurant_id`.
    ///
    /// An empty cart adopts the restaurant. If the item is already present
    /// its quantity is incremented, not overwritten. A non-empty cart bound
    /// to a different restaurant yields [`AddOutcome::Conflict`] and leaves
    /// the cart untouched. Adding zero of anything is a no-op: a line
    /// always carries a quantity of at least one.
    pub async fn add_item(
        &self,
        item: MenuItemRef,
        restaurant_id: &str,
        quantity: u32,
    ) -> Result<AddOutcome, TrundleError> {
        if quantity == 0 {
            return Ok(AddOutcome::Added);
        }
        let mut inner = self.inner.lock().await;

        if let Some(bound) = &inner.snapshot.restaurant_id {
            if bound != restaurant_id && !inner.snapshot.lines.is_empty() {
                let outcome = AddOutcome::Conflict {
                    current_restaurant_id: bound.clone(),
                    incoming_restaurant_id: restaurant_id.to_string(),
                };
                inner.pending = Some(PendingAdd {
                    item,
                    restaurant_id: restaurant_id.to_string(),
                    quantity,
                });
                return Ok(outcome);
            }
        }

        let mut next = inner.snapshot.clone();
        next.restaurant_id = Some(restaurant_id.to_string());
        match next.lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => line.quantity += quantity,
            None => next.lines.push(CartLine {
                item,
                quantity,
                restaurant_id: restaurant_id.to_string(),
            }),
        }

        self.commit(&mut inner, next).await?;
        Ok(AddOutcome::Added)
    }

    /// Settles a parked conflicting add.
    ///
    /// `accept == true` atomically clears the cart and reseeds it with
    /// exactly the parked line; `accept == false` drops the parked line
    /// and leaves the cart untouched. A call with nothing parked is a
    /// no-op.
    pub async fn resolve_conflict(&self, accept: bool) -> Result<(), TrundleError> {
        let mut inner = self.inner.lock().await;
        let Some(pending) = inner.pending.take() else {
            return Ok(());
        };

        if !accept {
            debug!("conflicting add declined, cart unchanged");
            return Ok(());
        }

        let next = CartSnapshot {
            lines: vec![CartLine {
                item: pending.item,
                quantity: pending.quantity,
                restaurant_id: pending.restaurant_id.clone(),
            }],
            restaurant_id: Some(pending.restaurant_id),
        };
        self.commit(&mut inner, next).await
    }

    /// Removes the line for `item_id`. An empty cart unbinds its
    /// restaurant so a different one can be started next.
    pub async fn remove_item(&self, item_id: &str) -> Result<(), TrundleError> {
        let mut inner = self.inner.lock().await;
        let mut next = inner.snapshot.clone();
        next.lines.retain(|line| line.item.id != item_id);
        if next.lines.is_empty() {
            next.restaurant_id = None;
        }
        self.commit(&mut inner, next).await
    }

    /// Sets the quantity of an existing line in place (order-preserving).
    /// A quantity of zero is equivalent to [`CartStore::remove_item`].
    pub async fn set_quantity(&self, item_id: &str, quantity: u32) -> Result<(), TrundleError> {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }
        let mut inner = self.inner.lock().await;
        let mut next = inner.snapshot.clone();
        if let Some(line) = next.lines.iter_mut().find(|line| line.item.id == item_id) {
            line.quantity = quantity;
        }
        self.commit(&mut inner, next).await
    }

    /// Empties all lines and the restaurant binding. Called after a
    /// successful checkout.
    pub async fn clear(&self) -> Result<(), TrundleError> {
        let mut inner = self.inner.lock().await;
        self.commit(&mut inner, CartSnapshot::default()).await
    }

    /// Current cart snapshot.
    pub async fn snapshot(&self) -> CartSnapshot {
        self.inner.lock().await.snapshot.clone()
    }

    /// Total price in cents over the current lines.
    pub async fn total_cents(&self) -> i64 {
        self.inner.lock().await.snapshot.total_cents()
    }

    /// Total item count over the current lines.
    pub async fn count(&self) -> u32 {
        self.inner.lock().await.snapshot.item_count()
    }

    /// Subscribes to cart snapshots. The receiver holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.tx.subscribe()
    }

    /// Persists `next` and only then makes it visible. A failed persist
    /// leaves both memory and storage at the previous acknowledged state.
    /// Any committed mutation voids a parked conflicting add: a conflict
    /// can only be settled by the immediately-following resolve.
    async fn commit(
        &self,
        inner: &mut Inner,
        next: CartSnapshot,
    ) -> Result<(), TrundleError> {
        let raw = serde_json::to_string(&next)
            .map_err(|e| TrundleError::Internal(format!("failed to encode cart: {e}")))?;
        self.store.put(keys::CART, &raw).await?;
        inner.snapshot = next;
        inner.pending = None;
        let _ = self.tx.send(inner.snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trundle_test_utils::MemoryStore;

    fn item(id: &str, price_cents: i64) -> MenuItemRef {
        MenuItemRef {
            id: id.into(),
            name: format!("item-{id}"),
            price_cents,
        }
    }

    async fn fresh_cart() -> (Arc<MemoryStore>, CartStore) {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::load(store.clone() as Arc<dyn StateStore>).await;
        (store, cart)
    }

    #[tokio::test]
    async fn empty_cart_has_zero_totals() {
        let (_store, cart) = fresh_cart().await;
        assert_eq!(cart.total_cents().await, 0);
        assert_eq!(cart.count().await, 0);
    }

    #[tokio::test]
    async fn totals_sum_price_times_quantity() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("burger", 500), "r1", 2).await.unwrap();
        cart.add_item(item("fries", 250), "r1", 1).await.unwrap();

        assert_eq!(cart.total_cents().await, 1250);
        assert_eq!(cart.count().await, 3);
    }

    #[tokio::test]
    async fn adding_existing_item_increments_quantity() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart.add_item(item("x", 100), "r1", 3).await.unwrap();

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.lines.len(), 1, "no duplicate line");
        assert_eq!(snapshot.lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn set_quantity_zero_equals_remove() {
        let (_store, cart_a) = fresh_cart().await;
        cart_a.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart_a.add_item(item("y", 200), "r1", 1).await.unwrap();
        cart_a.set_quantity("x", 0).await.unwrap();

        let (_store_b, cart_b) = fresh_cart().await;
        cart_b.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart_b.add_item(item("y", 200), "r1", 1).await.unwrap();
        cart_b.remove_item("x").await.unwrap();

        assert_eq!(cart_a.snapshot().await, cart_b.snapshot().await);
    }

    #[tokio::test]
    async fn set_quantity_replaces_in_place() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart.add_item(item("y", 200), "r1", 1).await.unwrap();
        cart.set_quantity("x", 7).await.unwrap();

        let snapshot = cart.snapshot().await;
        // Order is preserved; x stays first.
        assert_eq!(snapshot.lines[0].item.id, "x");
        assert_eq!(snapshot.lines[0].quantity, 7);
    }

    #[tokio::test]
    async fn removing_last_item_unbinds_restaurant() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 1).await.unwrap();
        cart.remove_item("x").await.unwrap();

        let snapshot = cart.snapshot().await;
        assert!(snapshot.lines.is_empty());
        assert!(snapshot.restaurant_id.is_none());

        // A different restaurant can now be started.
        let outcome = cart.add_item(item("z", 300), "r2", 1).await.unwrap();
        assert_eq!(outcome, AddOutcome::Added);
    }

    #[tokio::test]
    async fn conflicting_add_parks_and_decline_leaves_cart_unchanged() {
        let (store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        let before = cart.snapshot().await;
        let writes_before = store.writes();

        let outcome = cart.add_item(item("z", 300), "r2", 1).await.unwrap();
        assert_eq!(
            outcome,
            AddOutcome::Conflict {
                current_restaurant_id: "r1".into(),
                incoming_restaurant_id: "r2".into(),
            }
        );
        // Nothing mutated or persisted while the conflict is parked.
        assert_eq!(cart.snapshot().await, before);
        assert_eq!(store.writes(), writes_before);

        cart.resolve_conflict(false).await.unwrap();
        assert_eq!(cart.snapshot().await, before);
        assert_eq!(store.writes(), writes_before);
    }

    #[tokio::test]
    async fn accepting_conflict_reseeds_cart_with_the_new_line() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart.add_item(item("z", 300), "r2", 4).await.unwrap();
        cart.resolve_conflict(true).await.unwrap();

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.restaurant_id.as_deref(), Some("r2"));
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].item.id, "z");
        assert_eq!(snapshot.lines[0].quantity, 4);
    }

    #[tokio::test]
    async fn adding_zero_quantity_is_a_noop() {
        let (store, cart) = fresh_cart().await;

        let outcome = cart.add_item(item("x", 100), "r1", 0).await.unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        // No line, no binding, nothing persisted.
        assert!(cart.snapshot().await.lines.is_empty());
        assert!(cart.snapshot().await.restaurant_id.is_none());
        assert_eq!(store.writes(), 0);

        // Zero never reaches an existing line either.
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        cart.add_item(item("x", 100), "r1", 0).await.unwrap();
        assert_eq!(cart.snapshot().await.lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn mutation_after_conflict_voids_the_parked_line() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 2).await.unwrap();

        let outcome = cart.add_item(item("z", 300), "r2", 1).await.unwrap();
        assert!(matches!(outcome, AddOutcome::Conflict { .. }));

        // An unrelated committed mutation supersedes the parked conflict.
        cart.add_item(item("y", 200), "r1", 1).await.unwrap();
        let before = cart.snapshot().await;

        // A stray later accept must not reseed the cart with the stale line.
        cart.resolve_conflict(true).await.unwrap();
        assert_eq!(cart.snapshot().await, before);
        assert_eq!(before.restaurant_id.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn resolve_without_pending_conflict_is_a_noop() {
        let (_store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 1).await.unwrap();
        cart.resolve_conflict(true).await.unwrap();

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].item.id, "x");
    }

    #[tokio::test]
    async fn every_mutation_persists_before_returning() {
        let (store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 1).await.unwrap();
        assert_eq!(store.writes(), 1);

        cart.set_quantity("x", 3).await.unwrap();
        assert_eq!(store.writes(), 2);

        cart.clear().await.unwrap();
        assert_eq!(store.writes(), 3);

        let persisted: CartSnapshot =
            serde_json::from_str(&store.value(keys::CART).unwrap()).unwrap();
        assert_eq!(persisted, CartSnapshot::default());
    }

    #[tokio::test]
    async fn failed_persist_leaves_visible_state_unchanged() {
        let (store, cart) = fresh_cart().await;
        cart.add_item(item("x", 100), "r1", 1).await.unwrap();

        store.fail_writes(true);
        assert!(cart.add_item(item("y", 200), "r1", 1).await.is_err());

        let snapshot = cart.snapshot().await;
        assert_eq!(snapshot.lines.len(), 1, "rejected mutation must not apply");
    }

    #[tokio::test]
    async fn load_recovers_persisted_cart() {
        let store = Arc::new(MemoryStore::new());
        {
            let cart = CartStore::load(store.clone() as Arc<dyn StateStore>).await;
            cart.add_item(item("x", 500), "r1", 2).await.unwrap();
        }

        let reloaded = CartStore::load(store as Arc<dyn StateStore>).await;
        assert_eq!(reloaded.total_cents().await, 1000);
        assert_eq!(
            reloaded.snapshot().await.restaurant_id.as_deref(),
            Some("r1")
        );
    }

    #[tokio::test]
    async fn malformed_persisted_cart_is_discarded_silently() {
        let store = Arc::new(MemoryStore::new());
        store.seed(keys::CART, "{this is not json");

        let cart = CartStore::load(store as Arc<dyn StateStore>).await;
        assert_eq!(cart.count().await, 0);
        assert!(cart.snapshot().await.restaurant_id.is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let (_store, cart) = fresh_cart().await;
        let mut rx = cart.subscribe();

        cart.add_item(item("x", 100), "r1", 2).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().item_count(), 2);
    }
}
