//! Aggregation of raw records into chart-ready series
//!
//! Every function here is pure and recomputes from full snapshots. Running
//! one twice on the same input yields equal output.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Employee, InwardRecord, OutwardRecord, ReturnReason, ReturnRecord, Role};
use std::collections::HashMap;
use thiserror::Error;

use crate::feed::Feed;

/// A running total left the range `Decimal` can represent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{feed} total for {label} overflows")]
pub struct TotalOverflow {
    pub feed: Feed,
    pub label: String,
}

impl TotalOverflow {
    fn new(feed: Feed, label: impl Into<String>) -> Self {
        Self {
            feed,
            label: label.into(),
        }
    }
}

fn checked_accumulate(
    total: &mut Decimal,
    quantity: Decimal,
    feed: Feed,
    label: &str,
) -> Result<(), TotalOverflow> {
    *total = total
        .checked_add(quantity)
        .ok_or_else(|| TotalOverflow::new(feed, label))?;
    Ok(())
}

// ============================================================================
// Series Types
// ============================================================================

/// Employee count for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub label: String,
    pub count: usize,
}

/// One entry per known role, in role-list order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleCountSeries {
    pub entries: Vec<RoleCount>,
}

impl RoleCountSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.count)
    }

    /// Count for a role name, `None` if the role is unknown
    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.count)
    }
}

/// Godown capacity per outward record
///
/// `inwards` and `outwards` are both read from the outward record's godown,
/// so they are always identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapacitySeries {
    pub labels: Vec<String>,
    pub inwards: Vec<Decimal>,
    pub outwards: Vec<Decimal>,
}

impl CapacitySeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Quantities moved per product
///
/// `outward_totals[i]` and `inward_totals[i]` both belong to `labels[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductMovementSeries {
    pub labels: Vec<String>,
    pub outward_totals: Vec<Decimal>,
    pub inward_totals: Vec<Decimal>,
}

/// One aligned row of a [`ProductMovementSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductMovement<'a> {
    pub label: &'a str,
    pub outward_total: Decimal,
    pub inward_total: Decimal,
}

impl ProductMovementSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ProductMovement<'_>> {
        self.labels
            .iter()
            .zip(self.outward_totals.iter().zip(self.inward_totals.iter()))
            .map(|(label, (outward, inward))| ProductMovement {
                label,
                outward_total: *outward,
                inward_total: *inward,
            })
    }

    pub fn get(&self, label: &str) -> Option<ProductMovement<'_>> {
        self.rows().find(|row| row.label == label)
    }
}

/// Returned quantity per recognized reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReturnsSummary {
    pub cancelled: Decimal,
    pub damaged: Decimal,
}

impl ReturnsSummary {
    pub fn get(&self, reason: ReturnReason) -> Decimal {
        match reason {
            ReturnReason::Cancelled => self.cancelled,
            ReturnReason::Damaged => self.damaged,
        }
    }

    /// Sum of both buckets, `None` if it overflows
    pub fn total(&self) -> Option<Decimal> {
        self.cancelled.checked_add(self.damaged)
    }
}

// ============================================================================
// Role Counts
// ============================================================================

/// Count employees per known role.
///
/// The output has exactly one entry per role in `roles`; a role nobody holds
/// counts 0. Matching is exact, case-sensitive equality of role names.
pub fn count_roles(employees: &[Employee], roles: &[Role]) -> RoleCountSeries {
    let mut tally: HashMap<&str, usize> = HashMap::new();
    for employee in employees {
        *tally.entry(employee.role.name.as_str()).or_default() += 1;
    }

    RoleCountSeries {
        entries: roles
            .iter()
            .map(|role| RoleCount {
                label: role.name.clone(),
                count: tally.get(role.name.as_str()).copied().unwrap_or(0),
            })
            .collect(),
    }
}

/// Role counts from possibly unloaded snapshots.
///
/// `None` until the role snapshot is loaded and the employee snapshot is
/// loaded and non-empty; the dashboard keeps its loading placeholder until
/// then.
pub fn compute_role_counts(
    employees: Option<&[Employee]>,
    roles: Option<&[Role]>,
) -> Option<RoleCountSeries> {
    let employees = employees.filter(|e| !e.is_empty())?;
    Some(count_roles(employees, roles?))
}

// ============================================================================
// Logistics
// ============================================================================

/// One (location, capacity) pair per outward record, not grouped by location.
pub fn compute_capacity_series(outwards: &[OutwardRecord]) -> CapacitySeries {
    let labels = outwards.iter().map(|r| r.godown.location.clone()).collect();
    let capacities: Vec<Decimal> = outwards.iter().map(|r| r.godown.capacity_in_quintals).collect();
    CapacitySeries {
        labels,
        inwards: capacities.clone(),
        outwards: capacities,
    }
}

/// Sum quantities per product name across both feeds.
///
/// Labels are in first-seen order: outward records first, then inward
/// records naming products not seen among the outwards. A product present
/// in only one feed has 0 on the other side.
pub fn compute_product_movement(
    outwards: &[OutwardRecord],
    inwards: &[InwardRecord],
) -> Result<ProductMovementSeries, TotalOverflow> {
    let mut series = ProductMovementSeries::default();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in outwards {
        let name = record.product.name.as_str();
        let i = product_slot(&mut series, &mut index, name);
        checked_accumulate(&mut series.outward_totals[i], record.quantity, Feed::Outwards, name)?;
    }
    for record in inwards {
        let name = record.product.name.as_str();
        let i = product_slot(&mut series, &mut index, name);
        checked_accumulate(&mut series.inward_totals[i], record.quantity, Feed::Inwards, name)?;
    }

    Ok(series)
}

/// Index of `name` in the series, appending a zeroed row on first sight
fn product_slot<'a>(
    series: &mut ProductMovementSeries,
    index: &mut HashMap<&'a str, usize>,
    name: &'a str,
) -> usize {
    if let Some(&i) = index.get(name) {
        return i;
    }
    let i = series.labels.len();
    index.insert(name, i);
    series.labels.push(name.to_string());
    series.outward_totals.push(Decimal::ZERO);
    series.inward_totals.push(Decimal::ZERO);
    i
}

/// Total returned quantity per reason; unrecognized reasons are skipped.
pub fn compute_returns_summary(returns: &[ReturnRecord]) -> Result<ReturnsSummary, TotalOverflow> {
    returns
        .iter()
        .try_fold(ReturnsSummary::default(), |mut summary, record| {
            let bucket = match record.reason_kind() {
                Some(ReturnReason::Cancelled) => &mut summary.cancelled,
                Some(ReturnReason::Damaged) => &mut summary.damaged,
                None => {
                    tracing::trace!(reason = %record.reason, "Skipping unrecognized return reason");
                    return Ok(summary);
                }
            };
            checked_accumulate(bucket, record.quantity, Feed::Returns, &record.reason)?;
            Ok(summary)
        })
}
