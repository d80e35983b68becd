//! Storage entry entity - one JSON blob per key.
//!
//! Backs the SQLite [`crate::storage::SqliteStorage`]. Each portal collection
//! (users, tickets, cycles, notifications, session) is a single row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key/value row holding a serialized collection
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Storage key (e.g., `"app_tickets"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// JSON-encoded blob
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the blob was last written
    pub updated_at: DateTime,
}

/// `StorageEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
