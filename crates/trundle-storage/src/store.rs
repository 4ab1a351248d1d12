// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`StateStore`] trait.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tracing::debug;

use trundle_config::model::StorageConfig;
use trundle_core::{StateStore, TrundleError};

use crate::database::{map_tr_err, Database};

/// SQLite-backed durable key-value store.
///
/// `put` is durable before it returns: the write is committed on the
/// connection's background thread and awaited, so an acknowledged mutation
/// survives an immediate crash or reload.
#[derive(Debug, Clone)]
pub struct SqliteStateStore {
    db: Database,
}

impl SqliteStateStore {
    /// Opens the store at the configured database path.
    pub async fn open(config: &StorageConfig) -> Result<Self, TrundleError> {
        let db = Database::open(&config.database_path).await?;
        Ok(Self { db })
    }

    /// Opens an in-memory store (tests and ephemeral sessions).
    pub async fn open_in_memory() -> Result<Self, TrundleError> {
        let db = Database::open_in_memory().await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TrundleError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT value FROM client_state WHERE key = ?1")?;
                let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), TrundleError> {
        let owned_key = key.to_string();
        let value = value.to_string();
        let now = Utc::now().to_rfc3339();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO client_state (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                    params![owned_key, value, now],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(key, "client state persisted");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), TrundleError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute("DELETE FROM client_state WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
