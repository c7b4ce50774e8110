//! Fixed-window request counting over the shared store.
//!
//! Each client gets one counter per window, keyed `rate:{client}:{window_index}` with
//! `window_index = floor(unix_millis / window_millis)`. The counter is incremented first and
//! only then, when the increment created it, given a TTL of one window. Those are two separate
//! store calls: a crash in between leaves a counter without expiry that outlives its window.
//! That imprecision is accepted.
//!
//! A request is admitted while the post-increment count is strictly below the limit, so a
//! limit of `n` admits `n - 1` requests per window.

use std::sync::Arc;
use std::time::Duration;

use metrics::{Unit, counter, describe_counter};
use time::OffsetDateTime;
use tracing::debug;

use crate::cache::keys::rate_window_key;

use super::store::{KeyValueStore, StoreError};

const REJECTED_TOTAL: &str = "catalog_rate_limited_total";

pub(crate) fn describe_metrics() {
    describe_counter!(
        REJECTED_TOTAL,
        Unit::Count,
        "Requests rejected because their window was full."
    );
}

#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    store: Arc<dyn KeyValueStore>,
}

impl FixedWindowRateLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn allow(
        &self,
        client_id: &str,
        limit: u32,
        window: Duration,
    ) -> Result<bool, StoreError> {
        self.allow_at(client_id, limit, window, OffsetDateTime::now_utc())
            .await
    }

    pub async fn allow_at(
        &self,
        client_id: &str,
        limit: u32,
        window: Duration,
        now: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let index = window_index(now, window);
        let key = rate_window_key(client_id, index);

        let count = self.store.increment(&key).await?;
        if count == 1 {
            self.store.expire(&key, window).await?;
        }

        let allowed = count < i64::from(limit);
        if !allowed {
            counter!(REJECTED_TOTAL).increment(1);
            debug!(
                target = "catalog::coordination::rate_limit",
                client_id,
                window_index = index,
                count,
                limit,
                "request rejected"
            );
        }
        Ok(allowed)
    }
}

/// Time left until the window containing `now` closes.
pub fn window_remaining(now: OffsetDateTime, window: Duration) -> Duration {
    let now_millis = now.unix_timestamp_nanos().div_euclid(1_000_000);
    let window_millis = i128::try_from(window.as_millis()).unwrap_or(i128::MAX).max(1);
    let elapsed = now_millis.rem_euclid(window_millis);
    let remaining = u64::try_from(window_millis - elapsed).unwrap_or(u64::MAX);
    Duration::from_millis(remaining)
}

/// `floor(unix_millis / window_millis)`; a zero window is treated as one millisecond.
pub fn window_index(now: OffsetDateTime, window: Duration) -> i64 {
    let now_millis = now.unix_timestamp_nanos().div_euclid(1_000_000);
    let window_millis = i128::try_from(window.as_millis()).unwrap_or(i128::MAX).max(1);
    let index = now_millis.div_euclid(window_millis);
    i64::try_from(index).unwrap_or(i64::MAX)
}
