//! In-memory blob store for tests and ephemeral sessions.

use super::BlobStore;
use crate::errors::{Error, Result};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// A `HashMap`-backed [`BlobStore`].
///
/// Clones share the same map, so a test can keep a handle and inspect what the
/// portal wrote, or load a second portal from the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, simulating an unavailable or full store.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_writes.lock() {
            *flag = fail;
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_error() -> Error {
        Error::Io(std::io::Error::other("memory storage lock poisoned"))
    }
}

impl BlobStore for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| Self::lock_error())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let failing = *self.fail_writes.lock().map_err(|_| Self::lock_error())?;
        if failing {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::StorageFull,
                "storage quota exceeded",
            )));
        }

        let mut entries = self.entries.lock().map_err(|_| Self::lock_error())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
