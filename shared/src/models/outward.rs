//! Outward (dispatch) Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::godown::{Godown, GodownResponse};
use super::product::{Product, ProductResponse};
use super::quantity::decimal_from_json;
use crate::error::RecordError;
use crate::types::RecordId;

/// Outward transaction as returned by `GET /api/outwards`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutwardResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub godown: Option<GodownResponse>,
    #[serde(default)]
    pub product: Option<ProductResponse>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Validated outward transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutwardRecord {
    pub id: Option<RecordId>,
    pub godown: Godown,
    pub product: Product,
    pub quantity: Decimal,
}

impl OutwardRecord {
    pub fn new(godown: Godown, product: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            id: None,
            godown,
            product: Product::new(product),
            quantity,
        }
    }
}

impl TryFrom<OutwardResponse> for OutwardRecord {
    type Error = RecordError;

    fn try_from(value: OutwardResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            godown: Godown::from_embedded(value.godown)?,
            product: Product::from_embedded(value.product)?,
            quantity: decimal_from_json("quantity", value.quantity.as_ref())?,
        })
    }
}
