//! Shared types for the Godown dashboard
//!
//! Wire types returned by the inventory REST API, the validated records
//! derived from them, and the errors raised while validating.

pub mod error;
pub mod models;
pub mod types;

// Re-exports
pub use error::RecordError;
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
pub use types::RecordId;
