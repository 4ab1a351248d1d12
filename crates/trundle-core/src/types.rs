// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Trundle client components.
//!
//! Wire types use camelCase field names to match the service contracts;
//! status enums serialize as SCREAMING_SNAKE_CASE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Vendor,
    Admin,
    Engineer,
}

/// An authenticated user as returned by the session service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

/// The live authenticated identity held by the client process.
///
/// At most one session exists per process. Consumers read it as an
/// immutable snapshot and never mutate it; it is replaced wholesale on
/// login/register and cleared on logout or invalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Reference to a menu item, unique within its restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRef {
    pub id: String,
    pub name: String,
    /// Unit price in integer cents.
    pub price_cents: i64,
}

/// A single line in the cart: one menu item with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item: MenuItemRef,
    pub quantity: u32,
    pub restaurant_id: String,
}

/// The persisted cart shape: ordered lines plus the bound restaurant.
///
/// All lines in a non-empty cart share `restaurant_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub restaurant_id: Option<String>,
}

impl CartSnapshot {
    /// Total price in cents: sum of unit price times quantity over all lines.
    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| line.item.price_cents * i64::from(line.quantity))
            .sum()
    }

    /// Total item count: sum of quantities over all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// A restaurant in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Lifecycle states of an order, in forward order.
///
/// `Cancelled` is reachable from any non-terminal state; `Delivered` and
/// `Cancelled` are terminal. The server is authoritative -- the client
/// only observes and requests forward transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Preparing,
    Ready,
    Assigned,
    EnRoute,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// True for states from which no further transition is expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// A single item on a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price in integer cents.
    pub price_cents: i64,
}

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Read-only client projection of a server-owned order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Order total in integer cents.
    pub total_cents: i64,
    pub delivery_location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub robot_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operational state of a delivery robot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotStatus {
    Idle,
    Assigned,
    EnRoute,
    Charging,
    Maintenance,
    Offline,
}

/// Complete state of one robot as of the most recent telemetry frame.
///
/// Owned entirely by the fleet telemetry client and replaced wholesale on
/// each inbound frame -- never partially patched, so location, battery,
/// and status are always read as one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSnapshot {
    pub id: String,
    pub robot_id: String,
    pub status: RobotStatus,
    pub battery_percent: u8,
    pub location: Coordinates,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub distance_traveled: Option<f64>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}
