//! SQLite-backed blob store using the `storage_entries` table.

use super::BlobStore;
use crate::{
    entities::{StorageEntry, storage_entry},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{debug, instrument};

/// A [`BlobStore`] persisting each key as one row.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: DatabaseConnection,
}

impl SqliteStorage {
    /// Wraps a connection whose tables have already been created
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl BlobStore for SqliteStorage {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = StorageEntry::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        debug!("Storage entry '{}' present: {}", key, entry.is_some());
        Ok(entry.map(|e| e.value))
    }

    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        // Check if the key exists
        let existing = StorageEntry::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        if let Some(entry) = existing {
            let mut active_model: storage_entry::ActiveModel = entry.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = storage_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
            };
            new_entry.insert(&self.db).await?;
        }

        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }
}
