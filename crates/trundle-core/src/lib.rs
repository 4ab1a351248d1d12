// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Trundle delivery client state layer.
//!
//! This crate provides the shared domain types, the error type, and the
//! durable-storage trait used by every other crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TrundleError;
pub use traits::auth::{StaticToken, TokenProvider};
pub use traits::store::{keys, StateStore};
pub use types::{
    CartLine, CartSnapshot, Coordinates, MenuItemRef, Order, OrderItem, OrderStatus, Restaurant,
    RobotSnapshot, RobotStatus, Session, User, UserRole,
};
