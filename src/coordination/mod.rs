//! Coordination primitives backed by the shared key-value store.
//!
//! Nothing here keeps process-local state between calls: every decision is made by the store's
//! per-key atomic operations.

pub mod lock;
pub mod rate_limit;
pub mod store;

pub use lock::{LockGuard, LockManager};
pub use rate_limit::FixedWindowRateLimiter;
pub use store::{KeyValueStore, StoreError};
