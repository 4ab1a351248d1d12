// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Self-healing fleet telemetry stream client.
//!
//! Maintains a persistent SSE subscription to the telemetry service and
//! exposes the current fleet snapshot. Each inbound `telemetry` frame is
//! the complete fleet state and replaces the snapshot wholesale; there is
//! no per-robot merge, which keeps location, battery, and status readable
//! as one consistent unit.
//!
//! Any transport-level drop schedules exactly one reconnect attempt after
//! a fixed delay, looping indefinitely: the fleet view is expected to be
//! always-eventually-live while the subscription is open. A malformed
//! frame is surfaced as a transient notice and neither closes the
//! connection nor drops the known fleet state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trundle_api::wire;
use trundle_bus::AuthBus;
use trundle_config::model::TelemetryConfig;
use trundle_core::{RobotSnapshot, TokenProvider, TrundleError};

use crate::stream::{parse_frame, TELEMETRY_EVENT};

/// Connection state of the telemetry subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No subscription is open.
    #[default]
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The stream is live and frames are being applied.
    Open,
    /// The stream dropped; a reconnect is scheduled.
    Reconnecting,
}

/// The fleet view published to subscribers.
///
/// `robots` survives drops, reconnect waits, and malformed frames; only a
/// new telemetry frame replaces it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FleetState {
    pub connection: ConnectionState,
    pub robots: Vec<RobotSnapshot>,
}

/// Transient, non-fatal notices for subscribers that want them.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetNotice {
    /// A frame failed to parse; the connection and snapshot are intact.
    MalformedFrame { message: String },
    /// The stream dropped; a reconnect is scheduled.
    ConnectionLost { message: String },
}

/// Client for the telemetry event stream and its command channel.
pub struct FleetClient {
    http: reqwest::Client,
    base_url: String,
    reconnect_delay: Duration,
    tokens: Arc<dyn TokenProvider>,
    bus: AuthBus,
    tx: watch::Sender<FleetState>,
    notices: broadcast::Sender<FleetNotice>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl FleetClient {
    /// Creates a client for the configured telemetry service.
    pub fn new(
        config: &TelemetryConfig,
        bus: AuthBus,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, TrundleError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TrundleError::Internal(format!("failed to build HTTP client: {e}")))?;
        let (tx, _) = watch::channel(FleetState::default());
        let (notices, _) = broadcast::channel(32);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            reconnect_delay: Duration::from_secs(config.reconnect_delay_secs),
            tokens,
            bus,
            tx,
            notices,
            cancel: Mutex::new(None),
        })
    }

    /// Opens the persistent subscription.
    ///
    /// Runs until [`disconnect`](Self::disconnect): transport drops loop
    /// through a fixed-delay reconnect, never a fatal error. Calling
    /// `connect` while already connected supersedes the old subscription.
    pub fn connect(&self) {
        let cancel = CancellationToken::new();
        let previous = self.cancel.lock().unwrap().replace(cancel.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let http = self.http.clone();
        let url = format!("{}/telemetry/stream", self.base_url);
        let tokens = self.tokens.clone();
        let bus = self.bus.clone();
        let tx = self.tx.clone();
        let notices = self.notices.clone();
        let delay = self.reconnect_delay;

        tokio::spawn(async move {
            loop {
                set_connection(&tx, ConnectionState::Connecting);

                let mut request = http.get(&url);
                if let Some(token) = tokens.token() {
                    request = request.bearer_auth(token);
                }

                let outcome = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = request.send() => result,
                };

                let drop_reason = match outcome {
                    Ok(response) if response.status().is_success() => {
                        info!("telemetry stream open");
                        set_connection(&tx, ConnectionState::Open);
                        read_stream(response, &tx, &notices, &cancel).await
                    }
                    Ok(response) => {
                        let err = wire::rejection(response).await;
                        // The subscription carries the bearer token, so a
                        // 401-class refusal is the authorization-denied
                        // signal like on any other authorized call.
                        if err.is_auth_denied() {
                            if let TrundleError::Rejected { status, message } = &err {
                                bus.publish_session_invalidated(*status, message.clone());
                            }
                        }
                        format!("telemetry subscription rejected: {err}")
                    }
                    Err(e) => format!("telemetry connect failed: {e}"),
                };

                if cancel.is_cancelled() {
                    break;
                }

                warn!(reason = %drop_reason, delay_secs = delay.as_secs(), "stream dropped, reconnect scheduled");
                set_connection(&tx, ConnectionState::Reconnecting);
                let _ = notices.send(FleetNotice::ConnectionLost {
                    message: drop_reason,
                });

                // Exactly one scheduled reconnect per drop, fixed delay,
                // no retry cap.
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            set_connection(&tx, ConnectionState::Disconnected);
            debug!("telemetry subscription closed");
        });
    }

    /// Tears down the subscription and cancels any pending reconnect.
    ///
    /// Safe to call in any state, including mid-reconnect-wait, and
    /// idempotent. The known fleet snapshot is retained.
    pub fn disconnect(&self) {
        if let Some(cancel) = self.cancel.lock().unwrap().take() {
            cancel.cancel();
        }
    }

    /// Commands a robot to halt.
    ///
    /// Fire-and-forget with respect to the snapshot stream: the result is
    /// reported to the caller, but the local fleet state is never mutated
    /// here -- the next inbound frame is the sole source of truth for the
    /// robot's post-command state.
    pub async fn stop_robot(&self, robot_id: &str) -> Result<(), TrundleError> {
        let url = format!("{}/telemetry/robots/{robot_id}/stop", self.base_url);
        let mut request = self.http.post(&url);
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(wire::map_send_error)?;
        if response.status().is_success() {
            info!(robot_id, "stop command accepted");
            return Ok(());
        }

        let err = wire::rejection(response).await;
        if err.is_auth_denied() {
            if let TrundleError::Rejected { status, message } = &err {
                self.bus.publish_session_invalidated(*status, message.clone());
            }
        }
        Err(err)
    }

    /// Current fleet view.
    pub fn state(&self) -> FleetState {
        self.tx.borrow().clone()
    }

    /// Subscribes to fleet view updates.
    pub fn subscribe(&self) -> watch::Receiver<FleetState> {
        self.tx.subscribe()
    }

    /// Subscribes to transient notices (malformed frames, drops).
    pub fn notices(&self) -> broadcast::Receiver<FleetNotice> {
        self.notices.subscribe()
    }
}

impl Drop for FleetClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn set_connection(tx: &watch::Sender<FleetState>, connection: ConnectionState) {
    tx.send_modify(|state| state.connection = connection);
}

/// Consumes SSE events until the stream ends, errors, or is cancelled.
/// Returns the drop reason (empty-cancel returns early via the token).
async fn read_stream(
    response: reqwest::Response,
    tx: &watch::Sender<FleetState>,
    notices: &broadcast::Sender<FleetNotice>,
    cancel: &CancellationToken,
) -> String {
    let mut events = response.bytes_stream().eventsource();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => return "cancelled".to_string(),
            event = events.next() => event,
        };

        match event {
            Some(Ok(event)) if event.event == TELEMETRY_EVENT => {
                match parse_frame(&event.data) {
                    Ok(robots) => {
                        debug!(count = robots.len(), "fleet frame applied");
                        tx.send_modify(|state| state.robots = robots);
                    }
                    Err(e) => {
                        // Non-fatal: previous fleet state stays visible and
                        // the connection stays open.
                        warn!(error = %e, "malformed telemetry frame skipped");
                        let _ = notices.send(FleetNotice::MalformedFrame {
                            message: e.to_string(),
                        });
                    }
                }
            }
            // Keep-alives and unknown event names are ignored.
            Some(Ok(_)) => {}
            Some(Err(e)) => return format!("stream error: {e}"),
            None => return "stream ended".to_string(),
        }
    }
}
