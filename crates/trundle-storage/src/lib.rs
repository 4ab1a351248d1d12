// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Trundle delivery client.
//!
//! Provides WAL-mode SQLite storage with a single-writer concurrency model
//! via `tokio-rusqlite`, exposed through the [`trundle_core::StateStore`]
//! trait as a durable key-value substrate for cart and session snapshots.

pub mod database;
pub mod store;

pub use database::Database;
pub use store::SqliteStateStore;
