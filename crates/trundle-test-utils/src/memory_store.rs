// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`StateStore`] with write recording and failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use trundle_core::{StateStore, TrundleError};

/// An in-memory key-value store for tests.
///
/// Records the number of writes per key and can be switched into a failing
/// mode where every `put` errors, for exercising persistence failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    write_count: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a key, bypassing write counting.
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Total number of successful `put` calls.
    pub fn writes(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `put` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads a value synchronously (test assertions).
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TrundleError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), TrundleError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TrundleError::Storage {
                source: "injected write failure".into(),
            });
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TrundleError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_writes_and_injects_failures() {
        let store = MemoryStore::new();
        store.put("k", "v1").await.unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.value("k").as_deref(), Some("v1"));

        store.fail_writes(true);
        assert!(store.put("k", "v2").await.is_err());
        // Failed write leaves the previous value intact.
        assert_eq!(store.value("k").as_deref(), Some("v1"));
    }
}
