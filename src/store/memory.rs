//! In-memory store backend.
//!
//! Reference implementation of [`StoreBackend`] on a concurrent map. One
//! instance can be shared by several in-process members, which makes it
//! the backend of choice for tests and for simulating a whole window
//! group inside a single process.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::store::backend::{StoreBackend, StoreError};

/// Thread-safe in-memory implementation of [`StoreBackend`].
///
/// Get/put/remove are O(1) average; the map lives as long as the last
/// clone of the store, so it outlives any single member.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<DashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_key(&self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("Key cannot be empty".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.validate_key(key)?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.data.remove(key);
        Ok(())
    }
}
