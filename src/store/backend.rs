//! Store backend trait definition.
//!
//! The backend is a plain string-keyed JSON value store. Each call is a
//! single synchronous round-trip from the caller's point of view; there is
//! no batching and no transaction spanning multiple keys. Absence of a key
//! is not an error.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during store backend operations.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// The key is not acceptable to the backend.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A value could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend itself failed (I/O, capacity, ...).
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Abstraction over the shared key-value store.
///
/// Implementations must be thread-safe; a single backend instance is
/// shared by every periodic loop of a member, and an [`InMemoryStore`]
/// instance may additionally be shared by several in-process members.
///
/// # Expected Behavior
///
/// - `get` on a missing key returns `Ok(None)`, never an error.
/// - `put` replaces the whole value for the key atomically from the
///   caller's point of view.
/// - `remove` is idempotent; removing a missing key is `Ok(())`.
///
/// [`InMemoryStore`]: crate::store::InMemoryStore
#[mockall::automock]
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Retrieve the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the value stored under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
