//! Product cache over the shared key-value store.
//!
//! Entries are JSON documents under `product:{id}` with a fixed TTL. Two ways of driving them
//! exist side by side: explicit calls to [`EntryCache`] (cache-aside) and [`CacheAdvice`],
//! which wraps an operation body with populate/evict steps.

mod advice;
mod entries;
pub mod keys;

pub use advice::CacheAdvice;
pub use entries::EntryCache;
pub(crate) use entries::describe_metrics;
pub use keys::{product_key, rate_window_key};
