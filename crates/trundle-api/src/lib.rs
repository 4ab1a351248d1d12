// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the catalog/order and session services.
//!
//! One [`ApiClient`] covers every REST endpoint the client layer consumes:
//! authentication, catalog reads, order CRUD, tracking fetches, and status
//! transitions. Authorized calls carry the current session token and
//! publish on the auth bus when a service answers 401.

mod auth;
mod catalog;
pub mod client;
mod orders;
pub mod types;
pub mod wire;

pub use client::ApiClient;
pub use types::{
    AuthResponse, CreateOrderItem, CreateOrderRequest, LoginRequest, RegisterRequest, StatusPatch,
    TrackingResponse,
};
