//! Key-space conventions at the store boundary.
//!
//! Product cache entries and the guarded-update lock share the `product:` prefix, so a cached
//! product and the lock for the same id live under the same key.

const PRODUCT_PREFIX: &str = "product:";
const RATE_PREFIX: &str = "rate:";

/// `product:{id}`
pub fn product_key(id: i64) -> String {
    format!("{PRODUCT_PREFIX}{id}")
}

/// `rate:{client_id}:{window_index}`
pub fn rate_window_key(client_id: &str, window_index: i64) -> String {
    format!("{RATE_PREFIX}{client_id}:{window_index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_bit_exact() {
        assert_eq!(product_key(42), "product:42");
        assert_eq!(rate_window_key("client-a", 28_512_345), "rate:client-a:28512345");
    }
}
