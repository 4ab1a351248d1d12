// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-resident state layer for the Trundle campus delivery app.
//!
//! Ties the component crates together into one embeddable client: durable
//! storage, the shared session, the REST client, the cart, the order
//! tracker, and the fleet telemetry stream, all wired to the same auth
//! bus so a rejected credential anywhere clears the session everywhere.
//!
//! The wiring order matters: the [`SharedSession`] handle must exist
//! before the [`ApiClient`] (which reads tokens from it), and the
//! [`SessionManager`] must be built from that same handle so its swaps
//! are visible to every in-flight request. [`TrundleClient::bootstrap`]
//! encapsulates that order.

use std::sync::Arc;
use std::time::Duration;

use trundle_api::ApiClient;
use trundle_bus::AuthBus;
use trundle_cart::CartStore;
use trundle_config::TrundleConfig;
use trundle_core::{StateStore, TrundleError};
use trundle_fleet::FleetClient;
use trundle_orders::OrderTracker;
use trundle_session::{SessionManager, SharedSession};
use trundle_storage::SqliteStateStore;

pub use trundle_config::load_config;

/// The assembled client-resident state layer.
pub struct TrundleClient {
    api: ApiClient,
    session: Arc<SessionManager>,
    cart: CartStore,
    tracker: OrderTracker,
    fleet: FleetClient,
}

impl TrundleClient {
    /// Opens durable storage and wires every component.
    ///
    /// Does not touch the network: call [`SessionManager::init`] afterwards
    /// to revalidate a persisted session, and [`FleetClient::connect`] to
    /// open the telemetry stream.
    pub async fn bootstrap(config: &TrundleConfig) -> Result<Self, TrundleError> {
        let store = SqliteStateStore::open(&config.storage).await?;
        Self::with_store(config, Arc::new(store)).await
    }

    /// Wires every component on top of an existing [`StateStore`].
    pub async fn with_store(
        config: &TrundleConfig,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, TrundleError> {
        let shared = SharedSession::new();
        let bus = AuthBus::default();

        let api = ApiClient::new(&config.api, bus.clone(), Arc::new(shared.clone()))?;
        let session = SessionManager::new(api.clone(), store.clone(), shared.clone());
        let cart = CartStore::load(store).await;
        let tracker = OrderTracker::new(
            api.clone(),
            Duration::from_secs(config.tracking.poll_interval_secs),
        );
        let fleet = FleetClient::new(&config.telemetry, bus, Arc::new(shared))?;

        Ok(Self {
            api,
            session,
            cart,
            tracker,
            fleet,
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn tracker(&self) -> &OrderTracker {
        &self.tracker
    }

    pub fn fleet(&self) -> &FleetClient {
        &self.fleet
    }

    /// Stops every background task: the session bus listener, the tracking
    /// poll loop, and the telemetry stream. Idempotent.
    pub fn shutdown(&self) {
        self.fleet.disconnect();
        self.tracker.stop_tracking();
        self.session.close();
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` overrides the level when set. Call once at startup; embedders
/// with their own subscriber should skip this.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trundle={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
