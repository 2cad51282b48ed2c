//! Analytics store
//!
//! Holds the latest snapshot of every feed and the projections derived from
//! them. Writers replace snapshots wholesale; every change is announced on a
//! broadcast channel so renderers can redraw without polling the store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use shared::models::{Employee, InwardRecord, OutwardRecord, ReturnRecord, Role};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::aggregate::{
    CapacitySeries, ProductMovementSeries, ReturnsSummary, RoleCountSeries,
    compute_capacity_series, compute_product_movement, compute_returns_summary,
    TotalOverflow, compute_role_counts,
};
use crate::error::{ClientError, FailureKind};
use crate::feed::Feed;

/// Broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Derived value exposed to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    RoleCounts,
    Capacity,
    ProductMovement,
    Returns,
}

/// Store change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// A feed snapshot was replaced by a successful fetch
    SnapshotReplaced(Feed),
    /// A projection now holds a new value
    ProjectionUpdated(Projection),
    /// A fetch failed; the previous snapshot is kept
    FeedFailed(Feed),
}

/// Last known outcome of a feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    /// Never fetched
    Pending,
    /// Last fetch succeeded
    Ready {
        refreshed_at: DateTime<Utc>,
        records: usize,
    },
    /// Last fetch failed
    Failed {
        kind: FailureKind,
        message: String,
        failed_at: DateTime<Utc>,
        /// A previous snapshot is still being served
        stale: bool,
    },
}

impl FeedStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, FeedStatus::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FeedStatus::Failed { .. })
    }
}

/// Outwards, inwards and returns fetched in one logistics cycle
#[derive(Debug, Clone, Default)]
pub struct LogisticsBatch {
    pub outwards: Vec<OutwardRecord>,
    pub inwards: Vec<InwardRecord>,
    pub returns: Vec<ReturnRecord>,
}

/// Snapshots, projections and feed status
///
/// `None` means "not yet available": the feed was never fetched
/// successfully, or the projection has never been computed.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsState {
    pub employees: Option<Vec<Employee>>,
    pub roles: Option<Vec<Role>>,
    pub outwards: Option<Vec<OutwardRecord>>,
    pub inwards: Option<Vec<InwardRecord>>,
    pub returns: Option<Vec<ReturnRecord>>,

    pub role_counts: Option<RoleCountSeries>,
    pub capacity: Option<CapacitySeries>,
    pub product_movement: Option<ProductMovementSeries>,
    pub returns_summary: Option<ReturnsSummary>,

    status: HashMap<Feed, FeedStatus>,
}

impl AnalyticsState {
    pub fn feed_status(&self, feed: Feed) -> FeedStatus {
        self.status.get(&feed).cloned().unwrap_or(FeedStatus::Pending)
    }

    fn has_snapshot(&self, feed: Feed) -> bool {
        match feed {
            Feed::Employees => self.employees.is_some(),
            Feed::Roles => self.roles.is_some(),
            Feed::Outwards => self.outwards.is_some(),
            Feed::Inwards => self.inwards.is_some(),
            Feed::Returns => self.returns.is_some(),
        }
    }

    fn mark_ready(&mut self, feed: Feed, records: usize) {
        self.status.insert(
            feed,
            FeedStatus::Ready {
                refreshed_at: Utc::now(),
                records,
            },
        );
    }

    /// Recompute role counts, returning whether the projection changed
    fn refresh_role_counts(&mut self) -> bool {
        let counts = compute_role_counts(self.employees.as_deref(), self.roles.as_deref());
        if counts.is_none() || counts == self.role_counts {
            return false;
        }
        self.role_counts = counts;
        true
    }
}

/// Shared handle to the analytics state
#[derive(Debug, Clone)]
pub struct AnalyticsStore {
    inner: Arc<RwLock<AnalyticsState>>,
    events: broadcast::Sender<StoreEvent>,
}

impl AnalyticsStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(AnalyticsState::default())),
            events,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Clone of the whole state
    pub fn snapshot(&self) -> AnalyticsState {
        self.inner.read().clone()
    }

    pub fn role_counts(&self) -> Option<RoleCountSeries> {
        self.inner.read().role_counts.clone()
    }

    pub fn capacity(&self) -> Option<CapacitySeries> {
        self.inner.read().capacity.clone()
    }

    pub fn product_movement(&self) -> Option<ProductMovementSeries> {
        self.inner.read().product_movement.clone()
    }

    pub fn returns_summary(&self) -> Option<ReturnsSummary> {
        self.inner.read().returns_summary
    }

    pub fn feed_status(&self, feed: Feed) -> FeedStatus {
        self.inner.read().feed_status(feed)
    }

    /// Replace the employee snapshot and recompute role counts
    pub fn replace_employees(&self, employees: Vec<Employee>) {
        let mut events = vec![StoreEvent::SnapshotReplaced(Feed::Employees)];
        {
            let mut state = self.inner.write();
            state.mark_ready(Feed::Employees, employees.len());
            state.employees = Some(employees);
            if state.refresh_role_counts() {
                events.push(StoreEvent::ProjectionUpdated(Projection::RoleCounts));
            }
        }
        self.publish(events);
    }

    /// Replace the role snapshot and recompute role counts
    pub fn replace_roles(&self, roles: Vec<Role>) {
        let mut events = vec![StoreEvent::SnapshotReplaced(Feed::Roles)];
        {
            let mut state = self.inner.write();
            state.mark_ready(Feed::Roles, roles.len());
            state.roles = Some(roles);
            if state.refresh_role_counts() {
                events.push(StoreEvent::ProjectionUpdated(Projection::RoleCounts));
            }
        }
        self.publish(events);
    }

    /// Install a complete logistics cycle and recompute its projections
    ///
    /// Projections are computed before anything is written; if a total
    /// overflows, snapshots and projections are left untouched.
    pub fn apply_logistics(&self, batch: LogisticsBatch) -> Result<(), TotalOverflow> {
        let capacity = compute_capacity_series(&batch.outwards);
        let movement = compute_product_movement(&batch.outwards, &batch.inwards)?;
        let returns = compute_returns_summary(&batch.returns)?;

        let mut events = vec![
            StoreEvent::SnapshotReplaced(Feed::Outwards),
            StoreEvent::SnapshotReplaced(Feed::Inwards),
            StoreEvent::SnapshotReplaced(Feed::Returns),
        ];
        {
            let mut state = self.inner.write();
            state.mark_ready(Feed::Outwards, batch.outwards.len());
            state.mark_ready(Feed::Inwards, batch.inwards.len());
            state.mark_ready(Feed::Returns, batch.returns.len());
            state.outwards = Some(batch.outwards);
            state.inwards = Some(batch.inwards);
            state.returns = Some(batch.returns);

            if state.capacity.as_ref() != Some(&capacity) {
                state.capacity = Some(capacity);
                events.push(StoreEvent::ProjectionUpdated(Projection::Capacity));
            }
            if state.product_movement.as_ref() != Some(&movement) {
                state.product_movement = Some(movement);
                events.push(StoreEvent::ProjectionUpdated(Projection::ProductMovement));
            }
            if state.returns_summary != Some(returns) {
                state.returns_summary = Some(returns);
                events.push(StoreEvent::ProjectionUpdated(Projection::Returns));
            }
        }
        self.publish(events);
        Ok(())
    }

    /// Record a failed fetch. Snapshots and projections are left untouched.
    pub fn record_failure(&self, feed: Feed, error: &ClientError) {
        {
            let mut state = self.inner.write();
            let stale = state.has_snapshot(feed);
            state.status.insert(
                feed,
                FeedStatus::Failed {
                    kind: error.kind(),
                    message: error.to_string(),
                    failed_at: Utc::now(),
                    stale,
                },
            );
        }
        self.publish([StoreEvent::FeedFailed(feed)]);
    }

    fn publish(&self, events: impl IntoIterator<Item = StoreEvent>) {
        for event in events {
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::new()
    }
}
