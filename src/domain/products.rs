//! Product catalog entity and the commands that mutate it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::error::DomainError;

/// A catalog product as persisted by the record store.
///
/// Prices are kept in minor currency units so the value survives the cache round trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductCommand {
    pub name: String,
    pub price_cents: i64,
    pub description: Option<String>,
}

impl CreateProductCommand {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        ensure_price(self.price_cents)
    }
}

/// Partial update. Absent fields leave the stored value untouched; the name is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub price_cents: Option<i64>,
    pub description: Option<String>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.price_cents {
            Some(price) => ensure_price(price),
            None => Ok(()),
        }
    }

    pub fn apply_to(self, product: &mut ProductRecord) {
        if let Some(price) = self.price_cents {
            product.price_cents = price;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
    }
}

fn ensure_price(price_cents: i64) -> Result<(), DomainError> {
    if price_cents < 0 {
        return Err(DomainError::validation("price must not be negative"));
    }
    Ok(())
}

/// Consistency strategy selected per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Every call goes straight to the record store.
    #[default]
    #[serde(alias = "NONE_CACHE")]
    None,
    /// Explicit cache-aside with invalidate-on-write.
    #[serde(alias = "MANUAL")]
    Manual,
    /// The same protocol expressed as advice around plain store calls.
    #[serde(alias = "SPRING")]
    Declarative,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::None => "none",
            CacheMode::Manual => "manual",
            CacheMode::Declarative => "declarative",
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheMode {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" | "NONE_CACHE" => Ok(CacheMode::None),
            "manual" | "MANUAL" => Ok(CacheMode::Manual),
            "declarative" | "SPRING" => Ok(CacheMode::Declarative),
            other => Err(DomainError::validation(format!(
                "unknown cache mode `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn product() -> ProductRecord {
        ProductRecord {
            id: 7,
            name: "lamp".to_string(),
            price_cents: 1_999,
            description: Some("desk lamp".to_string()),
            created_at: datetime!(2024-05-01 10:00 UTC),
            updated_at: datetime!(2024-05-01 10:00 UTC),
        }
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut record = product();
        ProductPatch {
            price_cents: Some(2_500),
            description: None,
        }
        .apply_to(&mut record);

        assert_eq!(record.price_cents, 2_500);
        assert_eq!(record.description.as_deref(), Some("desk lamp"));
        assert_eq!(record.name, "lamp");
    }

    #[test]
    fn negative_prices_are_rejected() {
        let command = CreateProductCommand {
            name: "lamp".to_string(),
            price_cents: -1,
            description: None,
        };
        assert!(command.validate().is_err());

        let patch = ProductPatch {
            price_cents: Some(-5),
            description: None,
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        let command = CreateProductCommand {
            name: "   ".to_string(),
            price_cents: 100,
            description: None,
        };
        assert!(matches!(
            command.validate(),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn cache_mode_accepts_legacy_names() {
        assert_eq!("NONE_CACHE".parse::<CacheMode>().unwrap(), CacheMode::None);
        assert_eq!("manual".parse::<CacheMode>().unwrap(), CacheMode::Manual);
        assert_eq!(
            "SPRING".parse::<CacheMode>().unwrap(),
            CacheMode::Declarative
        );
        assert!("redis".parse::<CacheMode>().is_err());
    }

    #[test]
    fn record_survives_json_round_trip() {
        let record = product();
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: ProductRecord = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }
}
