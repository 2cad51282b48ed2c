//! Analytics pipeline
//!
//! Fetches the five collections from an [`InventorySource`], writes the
//! results into the [`AnalyticsStore`], and schedules the refreshes:
//!
//! - employees: immediately, then every `employee_poll`
//! - roles: once
//! - outwards → inwards → returns: once, or every `logistics_refresh`
//!
//! A failed fetch is logged and recorded as feed status; the previous
//! snapshot stays in place. Nothing is retried before the next scheduled run.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::store::{AnalyticsStore, LogisticsBatch};
use crate::config::{ClientConfig, PollSchedule};
use crate::error::ClientResult;
use crate::feed::Feed;
use crate::http::InventorySource;
use crate::tasks::{BackgroundTasks, TaskKind};

/// `tokio::time::interval` panics on a zero period
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fetch-and-aggregate pipeline feeding an [`AnalyticsStore`]
#[derive(Clone)]
pub struct AnalyticsPipeline {
    source: Arc<dyn InventorySource>,
    store: AnalyticsStore,
    schedule: PollSchedule,
}

impl AnalyticsPipeline {
    pub fn new(source: Arc<dyn InventorySource>, schedule: PollSchedule) -> Self {
        Self {
            source,
            store: AnalyticsStore::new(),
            schedule,
        }
    }

    /// Pipeline over the network client described by `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self::new(Arc::new(client), config.schedule))
    }

    pub fn store(&self) -> &AnalyticsStore {
        &self.store
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    // ========================================================================
    // Refresh operations
    // ========================================================================

    /// Fetch employees and replace the snapshot
    pub async fn refresh_employees(&self) -> ClientResult<()> {
        let employees = self.settle(Feed::Employees, self.source.employees().await)?;
        self.store.replace_employees(employees);
        Ok(())
    }

    /// Fetch roles and replace the snapshot
    pub async fn refresh_roles(&self) -> ClientResult<()> {
        let roles = self.settle(Feed::Roles, self.source.employee_roles().await)?;
        self.store.replace_roles(roles);
        Ok(())
    }

    /// Fetch employees and roles independently of each other
    ///
    /// Each snapshot is replaced on its own success. The first error, if
    /// any, is returned after both fetches have settled.
    pub async fn refresh_employees_and_roles(&self) -> ClientResult<()> {
        let (employees, roles) = tokio::join!(self.refresh_employees(), self.refresh_roles());
        employees.and(roles)
    }

    /// Run one logistics cycle
    ///
    /// The product label order is seeded by outwards and extended by inwards,
    /// so the feeds are fetched strictly one after another. The first
    /// failure aborts the cycle; already fetched feeds of this cycle are
    /// discarded and the previous projections stay in place.
    pub async fn refresh_logistics(&self) -> ClientResult<()> {
        let outwards = self.settle(Feed::Outwards, self.source.outwards().await)?;
        let inwards = self.settle(Feed::Inwards, self.source.inwards().await)?;
        let returns = self.settle(Feed::Returns, self.source.returns().await)?;

        tracing::debug!(
            outwards = outwards.len(),
            inwards = inwards.len(),
            returns = returns.len(),
            "Logistics cycle fetched"
        );
        let applied = self.store.apply_logistics(LogisticsBatch {
            outwards,
            inwards,
            returns,
        });
        if let Err(overflow) = applied {
            let feed = overflow.feed;
            self.settle(feed, Err(overflow.into()))?;
        }
        Ok(())
    }

    /// Log and record a failed fetch, passing the result through
    fn settle<T>(&self, feed: Feed, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(e) = &result {
            tracing::warn!(feed = %feed, error = %e, "Fetch failed, keeping previous snapshot");
            self.store.record_failure(feed, e);
        }
        result
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Start the scheduled refresh tasks
    ///
    /// The returned handle owns the tasks; shutting it down (or dropping it)
    /// cancels the timers and any fetch still in flight.
    pub fn start(&self) -> PipelineHandle {
        self.start_with_token(CancellationToken::new())
    }

    /// Start under an existing cancellation token
    pub fn start_with_token(&self, shutdown: CancellationToken) -> PipelineHandle {
        let mut tasks = BackgroundTasks::with_token(shutdown.clone());

        let pipeline = self.clone();
        let token = shutdown.clone();
        tasks.spawn("employee_poller", TaskKind::Periodic, async move {
            let period = pipeline.schedule.employee_poll;
            run_periodic(Feed::Employees, period, token, || {
                let pipeline = pipeline.clone();
                async move { pipeline.refresh_employees().await }
            })
            .await;
        });

        let pipeline = self.clone();
        let token = shutdown.clone();
        tasks.spawn("role_loader", TaskKind::Warmup, async move {
            run_once(Feed::Roles, token, pipeline.refresh_roles()).await;
        });

        let pipeline = self.clone();
        let token = shutdown.clone();
        match self.schedule.logistics_refresh {
            Some(period) => tasks.spawn("logistics_poller", TaskKind::Periodic, async move {
                run_periodic(Feed::Outwards, period, token, || {
                    let pipeline = pipeline.clone();
                    async move { pipeline.refresh_logistics().await }
                })
                .await;
            }),
            None => tasks.spawn("logistics_loader", TaskKind::Warmup, async move {
                run_once(Feed::Outwards, token, pipeline.refresh_logistics()).await;
            }),
        }

        tasks.log_summary();
        PipelineHandle {
            tasks: Some(tasks),
            shutdown,
        }
    }
}

/// Run `refresh` immediately and then every `period` until cancelled.
///
/// Each fetch is awaited before the next tick is taken, so runs of one feed
/// never overlap and snapshot writes arrive in request order.
async fn run_periodic<F, Fut>(feed: Feed, period: Duration, shutdown: CancellationToken, mut refresh: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<()>>,
{
    let mut ticker = tokio::time::interval(period.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::debug!(feed = %feed, "In-flight refresh cancelled");
                break;
            }
            // failures are already logged and recorded
            _ = refresh() => {}
        }
    }
    tracing::debug!(feed = %feed, "Poller stopped");
}

/// Run a one-shot refresh unless cancelled first
async fn run_once<Fut>(feed: Feed, shutdown: CancellationToken, refresh: Fut)
where
    Fut: Future<Output = ClientResult<()>>,
{
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
            tracing::debug!(feed = %feed, "One-shot refresh cancelled");
        }
        _ = refresh => {}
    }
}

/// Running pipeline
///
/// Dropping the handle cancels every task; [`PipelineHandle::shutdown`]
/// additionally waits for them to finish.
pub struct PipelineHandle {
    tasks: Option<BackgroundTasks>,
    shutdown: CancellationToken,
}

impl PipelineHandle {
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel all tasks and wait for them
    pub async fn shutdown(mut self) {
        if let Some(tasks) = self.tasks.take() {
            tasks.shutdown().await;
        }
    }
}

impl Drop for PipelineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::store::FeedStatus;
    use crate::error::{ClientError, FailureKind};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use shared::models::{Employee, Godown, InwardRecord, OutwardRecord, ReturnRecord, Role};
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeSource {
        employees: Mutex<Vec<Employee>>,
        roles: Mutex<Vec<Role>>,
        outwards: Mutex<Vec<OutwardRecord>>,
        inwards: Mutex<Vec<InwardRecord>>,
        returns: Mutex<Vec<ReturnRecord>>,
        failing: Mutex<HashSet<Feed>>,
        calls: Mutex<HashMap<Feed, usize>>,
        order: Mutex<Vec<Feed>>,
    }

    impl FakeSource {
        fn seeded() -> Self {
            let source = Self::default();
            *source.roles.lock() = vec![Role::new("Clerk"), Role::new("Manager")];
            *source.employees.lock() = vec![
                Employee::new("a", "Clerk"),
                Employee::new("b", "Clerk"),
                Employee::new("c", "Manager"),
            ];
            *source.outwards.lock() = vec![
                outward("Pune", 500, "Rice", 10),
                outward("Nashik", 300, "Rice", 5),
            ];
            *source.inwards.lock() = vec![
                InwardRecord::new("Rice", Decimal::from(20)),
                InwardRecord::new("Wheat", Decimal::from(8)),
            ];
            *source.returns.lock() = vec![
                ReturnRecord::new("cancelled", Decimal::from(3)),
                ReturnRecord::new("damaged", Decimal::from(2)),
                ReturnRecord::new("lost", Decimal::from(9)),
            ];
            source
        }

        fn fail(&self, feed: Feed) {
            self.failing.lock().insert(feed);
        }

        fn heal(&self, feed: Feed) {
            self.failing.lock().remove(&feed);
        }

        fn calls(&self, feed: Feed) -> usize {
            self.calls.lock().get(&feed).copied().unwrap_or(0)
        }

        fn answer<T: Clone>(&self, feed: Feed, data: &Mutex<Vec<T>>) -> ClientResult<Vec<T>> {
            *self.calls.lock().entry(feed).or_default() += 1;
            self.order.lock().push(feed);
            if self.failing.lock().contains(&feed) {
                return Err(ClientError::Status {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: format!("{feed} unavailable"),
                });
            }
            Ok(data.lock().clone())
        }
    }

    #[async_trait]
    impl InventorySource for FakeSource {
        async fn employees(&self) -> ClientResult<Vec<Employee>> {
            self.answer(Feed::Employees, &self.employees)
        }

        async fn employee_roles(&self) -> ClientResult<Vec<Role>> {
            self.answer(Feed::Roles, &self.roles)
        }

        async fn outwards(&self) -> ClientResult<Vec<OutwardRecord>> {
            self.answer(Feed::Outwards, &self.outwards)
        }

        async fn inwards(&self) -> ClientResult<Vec<InwardRecord>> {
            self.answer(Feed::Inwards, &self.inwards)
        }

        async fn returns(&self) -> ClientResult<Vec<ReturnRecord>> {
            self.answer(Feed::Returns, &self.returns)
        }
    }

    fn outward(location: &str, capacity: i64, product: &str, quantity: i64) -> OutwardRecord {
        OutwardRecord::new(
            Godown::new(location, Decimal::from(capacity)),
            product,
            Decimal::from(quantity),
        )
    }

    fn pipeline(source: &Arc<FakeSource>) -> AnalyticsPipeline {
        AnalyticsPipeline::new(source.clone(), PollSchedule::default())
    }

    #[tokio::test]
    async fn test_logistics_cycle_builds_projections() {
        let source = Arc::new(FakeSource::seeded());
        let pipeline = pipeline(&source);

        pipeline.refresh_logistics().await.unwrap();

        let store = pipeline.store();
        assert_eq!(
            *source.order.lock(),
            vec![Feed::Outwards, Feed::Inwards, Feed::Returns]
        );
        let capacity = store.capacity().unwrap();
        assert_eq!(capacity.labels, vec!["Pune", "Nashik"]);
        let movement = store.product_movement().unwrap();
        assert_eq!(movement.labels, vec!["Rice", "Wheat"]);
        assert_eq!(movement.outward_totals, vec![Decimal::from(15), Decimal::ZERO]);
        assert_eq!(movement.inward_totals, vec![Decimal::from(20), Decimal::from(8)]);
        let returns = store.returns_summary().unwrap();
        assert_eq!(returns.cancelled, Decimal::from(3));
        assert_eq!(returns.damaged, Decimal::from(2));
    }

    #[tokio::test]
    async fn test_inwards_failure_keeps_previous_projections() {
        let source = Arc::new(FakeSource::seeded());
        let pipeline = pipeline(&source);
        pipeline.refresh_logistics().await.unwrap();
        let capacity = pipeline.store().capacity();
        let movement = pipeline.store().product_movement();

        source.outwards.lock().push(outward("Nagpur", 900, "Salt", 1));
        source.fail(Feed::Inwards);

        let err = pipeline.refresh_logistics().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Status);
        // returns were never requested in the aborted cycle
        assert_eq!(source.calls(Feed::Returns), 1);

        let store = pipeline.store();
        assert_eq!(store.capacity(), capacity);
        assert_eq!(store.product_movement(), movement);
        assert!(store.feed_status(Feed::Outwards).is_ready());
        assert!(matches!(
            store.feed_status(Feed::Inwards),
            FeedStatus::Failed { stale: true, .. }
        ));

        source.heal(Feed::Inwards);
        pipeline.refresh_logistics().await.unwrap();
        assert_eq!(pipeline.store().capacity().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_first_failure_leaves_projection_unavailable() {
        let source = Arc::new(FakeSource::seeded());
        source.fail(Feed::Outwards);
        let pipeline = pipeline(&source);

        assert!(pipeline.refresh_logistics().await.is_err());
        assert_eq!(source.calls(Feed::Inwards), 0);
        assert!(pipeline.store().capacity().is_none());
        assert!(matches!(
            pipeline.store().feed_status(Feed::Outwards),
            FeedStatus::Failed { stale: false, .. }
        ));
    }

    #[tokio::test]
    async fn test_employee_and_role_feeds_are_independent() {
        let source = Arc::new(FakeSource::seeded());
        source.fail(Feed::Roles);
        let pipeline = pipeline(&source);

        assert!(pipeline.refresh_employees_and_roles().await.is_err());
        let state = pipeline.store().snapshot();
        assert_eq!(state.employees.as_ref().map(Vec::len), Some(3));
        assert!(state.roles.is_none());
        assert!(state.role_counts.is_none());

        source.heal(Feed::Roles);
        pipeline.refresh_employees_and_roles().await.unwrap();
        let counts = pipeline.store().role_counts().unwrap();
        assert_eq!(counts.get("Clerk"), Some(2));
        assert_eq!(counts.get("Manager"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_employee_feed_polls_until_shutdown() {
        let source = Arc::new(FakeSource::seeded());
        let handle = pipeline(&source).start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(Feed::Employees), 1);
        assert_eq!(source.calls(Feed::Roles), 1);
        assert_eq!(source.calls(Feed::Outwards), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.calls(Feed::Employees), 2);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.calls(Feed::Employees), 4);
        // roles and logistics are fetched once
        assert_eq!(source.calls(Feed::Roles), 1);
        assert_eq!(source.calls(Feed::Outwards), 1);

        assert!(handle.is_running());
        handle.shutdown().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls(Feed::Employees), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polled_failure_then_recovery() {
        let source = Arc::new(FakeSource::seeded());
        source.fail(Feed::Employees);
        let pipeline = pipeline(&source);
        let handle = pipeline.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(pipeline.store().role_counts().is_none());
        assert!(pipeline.store().feed_status(Feed::Employees).is_failed());

        source.heal(Feed::Employees);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(pipeline.store().role_counts().unwrap().get("Clerk"), Some(2));

        drop(handle);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(source.calls(Feed::Employees), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_logistics_when_configured() {
        let source = Arc::new(FakeSource::seeded());
        let config = ClientConfig::default()
            .with_employee_poll(Duration::from_secs(5))
            .with_logistics_refresh(Duration::from_secs(60));
        let handle = AnalyticsPipeline::new(source.clone(), config.schedule).start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(Feed::Returns), 1);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(Feed::Returns), 2);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_overflowing_totals_recorded_as_failure() {
        let source = Arc::new(FakeSource::seeded());
        let pipeline = pipeline(&source);
        pipeline.refresh_logistics().await.unwrap();
        let movement = pipeline.store().product_movement();

        let near_max = Decimal::from_scientific("6e28").unwrap();
        *source.returns.lock() = vec![
            ReturnRecord::new("damaged", near_max),
            ReturnRecord::new("damaged", near_max),
        ];

        let err = pipeline.refresh_logistics().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Overflow);

        let store = pipeline.store();
        assert_eq!(store.returns_summary().unwrap().damaged, Decimal::from(2));
        assert_eq!(store.product_movement(), movement);
        assert!(matches!(
            store.feed_status(Feed::Returns),
            FeedStatus::Failed { kind: FailureKind::Overflow, stale: true, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logistics_poller_survives_overflow() {
        let source = Arc::new(FakeSource::seeded());
        let near_max = Decimal::from_scientific("5e28").unwrap();
        *source.inwards.lock() = vec![
            InwardRecord::new("Rice", near_max),
            InwardRecord::new("Rice", near_max),
        ];
        let config = ClientConfig::default().with_logistics_refresh(Duration::from_secs(60));
        let pipeline = AnalyticsPipeline::new(source.clone(), config.schedule);
        let handle = pipeline.start();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(pipeline.store().product_movement().is_none());
        assert!(pipeline.store().feed_status(Feed::Inwards).is_failed());

        *source.inwards.lock() = vec![InwardRecord::new("Rice", Decimal::from(20))];
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(Feed::Outwards), 2);
        let movement = pipeline.store().product_movement().unwrap();
        assert_eq!(movement.get("Rice").unwrap().inward_total, Decimal::from(20));
        assert!(handle.is_running());

        handle.shutdown().await;
    }
}
