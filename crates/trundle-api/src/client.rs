// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the catalog/order and session services.
//!
//! Provides [`ApiClient`] which handles request construction, bearer-token
//! injection, response decoding, and the authorization-denied broadcast:
//! any authorized call answered with a 401-class status publishes a
//! session-invalidated event on the bus before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use trundle_bus::AuthBus;
use trundle_config::model::ApiConfig;
use trundle_core::{TokenProvider, TrundleError};

use crate::wire;

/// HTTP client for the delivery REST services.
///
/// Cheap to clone; all clones share the connection pool, the auth bus, and
/// the token source.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bus: AuthBus,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Creates a client for the configured service base URL.
    pub fn new(
        config: &ApiConfig,
        bus: AuthBus,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, TrundleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TrundleError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bus,
            tokens,
        })
    }

    /// The auth bus this client publishes invalidation events on.
    pub fn bus(&self) -> &AuthBus {
        &self.bus
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.http.patch(self.url(path))
    }

    /// Sends an unauthenticated request and decodes the JSON response.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TrundleError> {
        self.send(request).await
    }

    /// Sends a request with the current bearer credential attached.
    ///
    /// A 401-class rejection publishes a session-invalidated event on the
    /// bus before the error is returned to the caller.
    pub(crate) async fn execute_authorized<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TrundleError> {
        let request = match self.tokens.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let result = self.send(request).await;
        if let Err(err) = &result {
            if err.is_auth_denied() {
                let (status, message) = match err {
                    TrundleError::Rejected { status, message } => (*status, message.clone()),
                    _ => (401, String::new()),
                };
                warn!(status, "authorized call rejected, broadcasting invalidation");
                self.bus.publish_session_invalidated(status, message);
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TrundleError> {
        let response = request.send().await.map_err(wire::map_send_error)?;
        let status = response.status();
        debug!(status = %status, "service response received");

        if status.is_success() {
            let body = response.text().await.map_err(|e| TrundleError::Transport {
                message: format!("failed to read response body: {e}"),
                source: Some(Box::new(e)),
            })?;
            wire::parse_json(&body)
        } else {
            Err(wire::rejection(response).await)
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
