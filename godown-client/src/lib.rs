//! Godown Client - analytics pipeline for the warehouse dashboard
//!
//! Fetches employees, roles, outwards, inwards and returns from the
//! inventory REST API and keeps chart-ready aggregates of them up to date.

pub mod analytics;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod logger;
pub mod tasks;

pub use analytics::{AnalyticsPipeline, AnalyticsStore, DashboardSnapshot, PipelineHandle, StoreEvent};
pub use config::{ClientConfig, PollSchedule};
pub use error::{ClientError, ClientResult, FailureKind};
pub use feed::Feed;
pub use http::{InventorySource, NetworkHttpClient};

// Re-export shared types for convenience
pub use shared::models::{Employee, InwardRecord, OutwardRecord, ReturnRecord, Role};
