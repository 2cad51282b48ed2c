//! Godown (warehouse) Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::quantity::decimal_from_json;
use crate::error::RecordError;
use crate::types::RecordId;

/// Godown reference embedded in outward records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GodownResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "capacityInQuintals")]
    pub capacity_in_quintals: Option<Value>,
}

/// Validated godown reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Godown {
    pub id: Option<RecordId>,
    pub location: String,
    pub capacity_in_quintals: Decimal,
}

impl Godown {
    pub fn new(location: impl Into<String>, capacity_in_quintals: Decimal) -> Self {
        Self {
            id: None,
            location: location.into(),
            capacity_in_quintals,
        }
    }

    pub(crate) fn from_embedded(value: Option<GodownResponse>) -> Result<Self, RecordError> {
        let godown = value.ok_or(RecordError::missing("godown"))?;
        Ok(Self {
            id: godown.id,
            location: godown
                .location
                .ok_or(RecordError::missing("godown.location"))?,
            capacity_in_quintals: decimal_from_json(
                "godown.capacityInQuintals",
                godown.capacity_in_quintals.as_ref(),
            )?,
        })
    }
}
