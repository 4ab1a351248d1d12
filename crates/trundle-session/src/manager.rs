// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session manager: startup revalidation, login/register/logout, and
//! bus-driven invalidation.
//!
//! At most one session is live per process. It is hydrated from durable
//! storage at startup and revalidated against the session service before
//! consumers may rely on it; until then the manager reports
//! [`SessionPhase::Loading`]. Login and register replace the session
//! wholesale; logout is purely local. The manager is the sole subscriber
//! of the auth bus and clears its own state when any authorized call is
//! rejected, decoupling transport-layer auth failures from session state.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trundle_api::ApiClient;
use trundle_core::{keys, Session, StateStore, TrundleError, UserRole};

use crate::shared::SharedSession;

/// Observable phase of the session lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    /// Startup revalidation has not completed yet.
    Loading,
    /// A session is live.
    Authenticated(Session),
    /// No session is live.
    Anonymous,
}

/// Owns the current authenticated identity and token.
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn StateStore>,
    shared: SharedSession,
    tx: watch::Sender<SessionPhase>,
    cancel: CancellationToken,
}

impl SessionManager {
    /// Creates the manager and starts its auth-bus listener.
    ///
    /// `shared` must be the same handle the [`ApiClient`] was built with,
    /// so that installed tokens are immediately visible to authorized
    /// calls.
    pub fn new(api: ApiClient, store: Arc<dyn StateStore>, shared: SharedSession) -> Arc<Self> {
        let (tx, _) = watch::channel(SessionPhase::Loading);
        let manager = Arc::new(Self {
            api,
            store,
            shared,
            tx,
            cancel: CancellationToken::new(),
        });

        manager.spawn_bus_listener();
        manager
    }

    /// Hydrates and revalidates any persisted session.
    ///
    /// On a verified token the in-memory session is installed and
    /// re-persisted (the identity may have changed server-side). Any
    /// verification failure -- transport or rejection -- silently clears
    /// the persisted session; consumers simply start logged out. Resolves
    /// only after the check completes.
    pub async fn init(&self) -> Result<(), TrundleError> {
        let token = self.read_persisted(keys::SESSION_TOKEN).await;
        let cached_user = self.read_persisted(keys::SESSION_USER).await;

        let Some(token) = token else {
            debug!("no persisted session");
            self.publish(SessionPhase::Anonymous);
            return Ok(());
        };

        if cached_user.is_none() {
            // Half a session is no session.
            self.clear_local().await?;
            return Ok(());
        }

        match self.api.verify_token(&token).await {
            Ok(user) => {
                info!(user_id = %user.id, "persisted session verified");
                self.install(Session { user, token }).await
            }
            Err(e) => {
                debug!(error = %e, "persisted session rejected, clearing");
                self.clear_local().await
            }
        }
    }

    /// Authenticates against the session service and installs the result.
    ///
    /// Service failures propagate with the rejection message intact for
    /// user display.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, TrundleError> {
        let auth = self.api.login(email, password).await?;
        let session = Session {
            user: auth.user,
            token: auth.token,
        };
        self.install(session.clone()).await?;
        Ok(session)
    }

    /// Registers a new account and installs the returned session.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Session, TrundleError> {
        let auth = self.api.register(email, name, password, role).await?;
        let session = Session {
            user: auth.user,
            token: auth.token,
        };
        self.install(session.clone()).await?;
        Ok(session)
    }

    /// Clears the session locally. No server call is made.
    pub async fn logout(&self) -> Result<(), TrundleError> {
        info!("logging out");
        self.clear_local().await
    }

    /// Current session snapshot.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.shared.get()
    }

    /// The shared handle backing authorized calls.
    pub fn shared(&self) -> SharedSession {
        self.shared.clone()
    }

    /// Subscribes to session phase changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.tx.subscribe()
    }

    /// Stops the bus listener. Dropping the manager does the same.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    fn spawn_bus_listener(self: &Arc<Self>) {
        let mut rx = self.api.bus().subscribe();
        let manager = Arc::downgrade(self);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(event) => {
                            let Some(manager) = manager.upgrade() else { break };
                            debug!(?event.kind, "session invalidated by collaborator");
                            if let Err(e) = manager.clear_local().await {
                                warn!(error = %e, "failed to clear invalidated session");
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            // Collapsed invalidations all mean the same thing.
                            warn!(skipped, "auth bus lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
    }

    async fn install(&self, session: Session) -> Result<(), TrundleError> {
        let user_json = serde_json::to_string(&session.user)
            .map_err(|e| TrundleError::Internal(format!("failed to encode user: {e}")))?;
        self.store.put(keys::SESSION_TOKEN, &session.token).await?;
        self.store.put(keys::SESSION_USER, &user_json).await?;
        self.shared.set(session.clone());
        self.publish(SessionPhase::Authenticated(session));
        Ok(())
    }

    async fn clear_local(&self) -> Result<(), TrundleError> {
        self.store.remove(keys::SESSION_TOKEN).await?;
        self.store.remove(keys::SESSION_USER).await?;
        self.shared.clear();
        self.publish(SessionPhase::Anonymous);
        Ok(())
    }

    async fn read_persisted(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "session storage unreadable");
                None
            }
        }
    }

    fn publish(&self, phase: SessionPhase) {
        let _ = self.tx.send(phase);
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
