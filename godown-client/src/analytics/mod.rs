//! Warehouse analytics
//!
//! Turns the raw employee, role, outward, inward and return collections into
//! the series the dashboard charts are drawn from.

pub mod aggregate;
pub mod chart;
pub mod pipeline;
pub mod store;

pub use aggregate::{
    CapacitySeries, ProductMovement, ProductMovementSeries, ReturnsSummary, RoleCount,
    RoleCountSeries, TotalOverflow, compute_capacity_series, compute_product_movement, compute_returns_summary,
    compute_role_counts, count_roles,
};
pub use chart::{BarChart, DashboardSnapshot, Dataset, PieSlice};
pub use pipeline::{AnalyticsPipeline, PipelineHandle};
pub use store::{
    AnalyticsState, AnalyticsStore, FeedStatus, LogisticsBatch, Projection, StoreEvent,
};
