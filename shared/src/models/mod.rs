//! Data models
//!
//! Each API collection has a `*Response` wire type, decoded leniently from
//! the JSON the backend returns, and a validated record built from it with
//! `TryFrom`. Aggregation only ever sees validated records.

pub mod employee;
pub mod godown;
pub mod inward;
pub mod outward;
pub mod product;
pub mod quantity;
pub mod returns;
pub mod role;

// Re-exports
pub use employee::*;
pub use godown::*;
pub use inward::*;
pub use outward::*;
pub use product::*;
pub use quantity::decimal_from_json;
pub use returns::*;
pub use role::*;
