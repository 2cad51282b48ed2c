//! Product Model

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::RecordId;

/// Product reference embedded in inward and outward records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated product reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<RecordId>,
    pub name: String,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Validate an optional embedded product reference
    pub(crate) fn from_embedded(value: Option<ProductResponse>) -> Result<Self, RecordError> {
        let product = value.ok_or(RecordError::missing("product"))?;
        Ok(Self {
            id: product.id,
            name: product.name.ok_or(RecordError::missing("product.name"))?,
        })
    }
}
