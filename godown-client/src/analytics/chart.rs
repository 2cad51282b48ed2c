//! Chart-ready projections
//!
//! Labels plus parallel datasets, serialized in the shape bar and pie chart
//! widgets consume directly.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregate::{CapacitySeries, ProductMovementSeries, ReturnsSummary, RoleCountSeries};
use super::store::{AnalyticsState, FeedStatus};
use crate::feed::Feed;

pub const CAPACITY_TITLE: &str = "Godown (Capacity Vs. Location)";
pub const PRODUCTS_TITLE: &str = "Products Vs Quantity (Inwards & Outwards)";
pub const EMPLOYEES_TITLE: &str = "Employee Count";

/// One bar series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Bar chart: one label per bar group, datasets aligned to the labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Pie slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

fn to_f64(values: &[Decimal]) -> Vec<f64> {
    values.iter().map(|v| v.to_f64().unwrap_or_default()).collect()
}

fn dataset(label: &str, data: Vec<f64>) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
    }
}

impl From<&CapacitySeries> for BarChart {
    fn from(series: &CapacitySeries) -> Self {
        Self {
            title: CAPACITY_TITLE.to_string(),
            labels: series.labels.clone(),
            datasets: vec![
                dataset("Inwards", to_f64(&series.inwards)),
                dataset("Outwards", to_f64(&series.outwards)),
            ],
        }
    }
}

impl From<&ProductMovementSeries> for BarChart {
    fn from(series: &ProductMovementSeries) -> Self {
        Self {
            title: PRODUCTS_TITLE.to_string(),
            labels: series.labels.clone(),
            datasets: vec![
                dataset("Inwards", to_f64(&series.inward_totals)),
                dataset("Outwards", to_f64(&series.outward_totals)),
            ],
        }
    }
}

impl From<&RoleCountSeries> for BarChart {
    fn from(series: &RoleCountSeries) -> Self {
        Self {
            title: EMPLOYEES_TITLE.to_string(),
            labels: series.labels().map(str::to_string).collect(),
            datasets: vec![dataset(
                EMPLOYEES_TITLE,
                series.counts().map(|c| c as f64).collect(),
            )],
        }
    }
}

/// Cancelled first, then damaged
pub fn returns_pie(summary: &ReturnsSummary) -> Vec<PieSlice> {
    vec![
        PieSlice {
            name: "Cancelled".into(),
            value: summary.cancelled.to_f64().unwrap_or_default(),
        },
        PieSlice {
            name: "Damaged".into(),
            value: summary.damaged.to_f64().unwrap_or_default(),
        },
    ]
}

/// Everything the dashboard renders; `None` charts are still loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub capacity: Option<BarChart>,
    pub employees_by_role: Option<BarChart>,
    pub products: Option<BarChart>,
    pub returns: Option<Vec<PieSlice>>,
    pub feeds: BTreeMap<String, FeedStatus>,
}

impl DashboardSnapshot {
    pub fn from_state(state: &AnalyticsState) -> Self {
        Self {
            capacity: state.capacity.as_ref().map(BarChart::from),
            employees_by_role: state.role_counts.as_ref().map(BarChart::from),
            products: state.product_movement.as_ref().map(BarChart::from),
            returns: state.returns_summary.as_ref().map(returns_pie),
            feeds: Feed::ALL
                .iter()
                .map(|feed| (feed.name().to_string(), state.feed_status(*feed)))
                .collect(),
        }
    }

    /// True once every chart has a value
    pub fn is_complete(&self) -> bool {
        self.capacity.is_some()
            && self.employees_by_role.is_some()
            && self.products.is_some()
            && self.returns.is_some()
    }
}
