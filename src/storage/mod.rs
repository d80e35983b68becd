//! Durable key/value blob storage.
//!
//! The portal persists each collection as one JSON blob under a fixed key.
//! [`BlobStore`] is the only seam between the store and its environment, so
//! tests run against [`MemoryStorage`] and the binary against [`SqliteStorage`].

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::errors::Result;
use std::future::Future;

/// Key of the users collection.
pub const USERS_KEY: &str = "app_users";
/// Key of the persisted session.
pub const SESSION_KEY: &str = "app_current_user";
/// Key of the tickets collection.
pub const TICKETS_KEY: &str = "app_tickets";
/// Key of the maintenance cycles collection.
pub const CYCLES_KEY: &str = "app_cycles";
/// Key of the notifications collection.
pub const NOTIFICATIONS_KEY: &str = "app_notifications";

/// Raw get/set of string blobs by key.
pub trait BlobStore {
    /// Returns the blob stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}
