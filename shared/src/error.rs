//! Record validation errors

use thiserror::Error;

/// A record returned by the API could not be turned into a domain record.
///
/// Raised when a nested reference the aggregation depends on is absent
/// (`product`, `godown`, `role`, ...) or when a quantity cannot be read as a
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is missing or `null`
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    /// A numeric field holds something that is not a number
    #[error("invalid number in `{field}`: {value}")]
    InvalidQuantity { field: &'static str, value: String },
}

impl RecordError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            field,
            value: value.into(),
        }
    }
}
