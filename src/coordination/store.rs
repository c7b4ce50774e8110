//! Atomic single-key operations the coordination primitives are built on.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("key-value store unavailable: {message}")]
    Unavailable { message: String },
    /// The store answered but refused the command.
    #[error("key-value store rejected command: {message}")]
    Command { message: String },
    #[error("value could not be encoded for the store: {message}")]
    Encoding { message: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }
}

/// Shared remote key-value store.
///
/// Every method is a single round trip and atomic for its key. Nothing is atomic across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key` with `ttl`, only if `key` does not exist. Returns whether the
    /// value was written.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration)
    -> Result<bool, StoreError>;

    /// Unconditionally store `value` under `key` with `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove `key`. Returns whether a key was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Remove `key` only if its current value equals `expected`.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, StoreError>;

    /// Increment the integer at `key`, creating it at zero first. Returns the new value.
    async fn increment(&self, key: &str) -> Result<i64, StoreError>;

    /// Set the expiry of an existing key. Returns `false` when the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Remaining time to live. `None` when the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
