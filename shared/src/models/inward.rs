//! Inward (receipt) Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::{Product, ProductResponse};
use super::quantity::decimal_from_json;
use crate::error::RecordError;
use crate::types::RecordId;

/// Inward transaction as returned by `GET /api/inwards`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InwardResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub product: Option<ProductResponse>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Validated inward transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InwardRecord {
    pub id: Option<RecordId>,
    pub product: Product,
    pub quantity: Decimal,
}

impl InwardRecord {
    pub fn new(product: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            id: None,
            product: Product::new(product),
            quantity,
        }
    }
}

impl TryFrom<InwardResponse> for InwardRecord {
    type Error = RecordError;

    fn try_from(value: InwardResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            product: Product::from_embedded(value.product)?,
            quantity: decimal_from_json("quantity", value.quantity.as_ref())?,
        })
    }
}
