//! Numeric coercion for quantities and capacities

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::RecordError;

/// Read a decimal from a JSON value that may be a number or a numeric string.
///
/// Missing and `null` values are reported as [`RecordError::MissingField`];
/// anything else that does not parse (empty strings, booleans, free text)
/// is [`RecordError::InvalidQuantity`]. So is any magnitude beyond
/// [`Decimal::MAX`] (about 7.9e28).
pub fn decimal_from_json(field: &'static str, value: Option<&Value>) -> Result<Decimal, RecordError> {
    match value {
        None | Some(Value::Null) => Err(RecordError::missing(field)),
        Some(Value::Number(n)) => parse_decimal(&n.to_string())
            .ok_or_else(|| RecordError::invalid(field, n.to_string())),
        Some(Value::String(s)) => {
            parse_decimal(s.trim()).ok_or_else(|| RecordError::invalid(field, s.clone()))
        }
        Some(other) => Err(RecordError::invalid(field, other.to_string())),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
