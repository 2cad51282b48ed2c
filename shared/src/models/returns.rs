//! Return Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::quantity::decimal_from_json;
use crate::error::RecordError;
use crate::types::RecordId;

/// Recognized return reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnReason {
    Cancelled,
    Damaged,
}

impl ReturnReason {
    /// Exact, case-sensitive match against the API's reason strings.
    /// Anything else is not a recognized reason.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cancelled" => Some(ReturnReason::Cancelled),
            "damaged" => Some(ReturnReason::Damaged),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnReason::Cancelled => "cancelled",
            ReturnReason::Damaged => "damaged",
        }
    }
}

impl fmt::Display for ReturnReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return as returned by `GET /api/returns`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub quantity: Option<Value>,
}

/// Validated return
///
/// The reason is kept verbatim; [`ReturnRecord::reason_kind`] classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub id: Option<RecordId>,
    pub reason: String,
    pub quantity: Decimal,
}

impl ReturnRecord {
    pub fn new(reason: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            id: None,
            reason: reason.into(),
            quantity,
        }
    }

    pub fn reason_kind(&self) -> Option<ReturnReason> {
        ReturnReason::parse(&self.reason)
    }
}

impl TryFrom<ReturnResponse> for ReturnRecord {
    type Error = RecordError;

    fn try_from(value: ReturnResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            reason: value.reason.ok_or(RecordError::missing("reason"))?,
            quantity: decimal_from_json("quantity", value.quantity.as_ref())?,
        })
    }
}
