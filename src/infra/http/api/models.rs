use serde::{Deserialize, Serialize};

use crate::domain::products::{CreateProductCommand, ProductPatch};

#[derive(Debug, Deserialize, Serialize)]
pub struct ProductCreateRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ProductCreateRequest> for CreateProductCommand {
    fn from(request: ProductCreateRequest) -> Self {
        Self {
            name: request.name,
            price_cents: request.price_cents,
            description: request.description,
        }
    }
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProductUpdateRequest {
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<ProductUpdateRequest> for ProductPatch {
    fn from(request: ProductUpdateRequest) -> Self {
        Self {
            price_cents: request.price_cents,
            description: request.description,
        }
    }
}
