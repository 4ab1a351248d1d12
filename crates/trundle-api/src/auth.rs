// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session service endpoints: login, register, identity verification.

use trundle_core::{TrundleError, User, UserRole};

use crate::client::ApiClient;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest};

impl ApiClient {
    /// `POST /auth/login`. Rejection messages are preserved verbatim for
    /// user display.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, TrundleError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.post("/auth/login").json(&body)).await
    }

    /// `POST /auth/register`.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: UserRole,
    ) -> Result<AuthResponse, TrundleError> {
        let body = RegisterRequest {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
            role,
        };
        self.execute(self.post("/auth/register").json(&body)).await
    }

    /// `GET /auth/me` with the supplied token rather than the shared one.
    ///
    /// Used by the session manager during startup revalidation, before the
    /// persisted token has been installed as the live credential.
    pub async fn verify_token(&self, token: &str) -> Result<User, TrundleError> {
        self.execute(self.get("/auth/me").bearer_auth(token)).await
    }

    /// `GET /auth/me` with the current shared credential.
    pub async fn me(&self) -> Result<User, TrundleError> {
        self.execute_authorized(self.get("/auth/me")).await
    }
}
