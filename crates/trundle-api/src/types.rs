// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies for the delivery service endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trundle_core::{CartSnapshot, Coordinates, Order, RobotSnapshot, User, UserRole};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: UserRole,
}

/// Response of both auth endpoints: the identity plus an opaque token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// A line item on an order creation request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    pub price_cents: i64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub vendor_id: String,
    pub items: Vec<CreateOrderItem>,
    pub delivery_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_location_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_location_lng: Option<f64>,
}

impl CreateOrderRequest {
    /// Builds an order request from a cart snapshot.
    ///
    /// Returns `None` for an empty or unbound cart -- there is nothing to
    /// order.
    pub fn from_cart(
        user_id: impl Into<String>,
        cart: &CartSnapshot,
        delivery_location: impl Into<String>,
        coordinates: Option<Coordinates>,
    ) -> Option<Self> {
        let vendor_id = cart.restaurant_id.clone()?;
        if cart.lines.is_empty() {
            return None;
        }
        Some(Self {
            user_id: user_id.into(),
            vendor_id,
            items: cart
                .lines
                .iter()
                .map(|line| CreateOrderItem {
                    menu_item_id: line.item.id.clone(),
                    name: line.item.name.clone(),
                    quantity: line.quantity,
                    price_cents: line.item.price_cents,
                })
                .collect(),
            delivery_location: delivery_location.into(),
            delivery_location_lat: coordinates.map(|c| c.lat),
            delivery_location_lng: coordinates.map(|c| c.lng),
        })
    }
}

/// Body of `PATCH /orders/{id}/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPatch {
    pub status: trundle_core::OrderStatus,
}

/// Response of `GET /orders/{id}/tracking`.
///
/// The server also echoes a derived `progress` object; the client ignores
/// it and computes progress locally from `order.status`, which is the
/// authoritative field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    pub order: Order,
    #[serde(default)]
    pub robot: Option<RobotSnapshot>,
    #[serde(default)]
    pub estimated_delivery_time: Option<DateTime<Utc>>,
}
