// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Trundle delivery client.

pub mod memory_store;

pub use memory_store::MemoryStore;
