//! Periodic reconciliation of the dispatch table against the mapping store.
//!
//! The reconciler is the sole writer of the published [`DispatchTable`]. It
//! runs one pass synchronously before the listener starts accepting (so the
//! first request sees a populated table) and then on a fixed period as a
//! background task. Each pass fetches the enabled mappings, builds a fresh
//! table and publishes it with one atomic swap. A failed pass keeps the
//! previous table in place; the next tick tries again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use portico_core::dispatch::{DefaultEntry, DispatchHandle, DispatchTable};
use portico_core::ports::{MappingStore, RepositoryError};

/// How long [`ReconcilerHandle::shutdown`] waits for the loop to wind down
/// before aborting the task.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Why a reconciliation pass could not publish a new table.
///
/// Both variants are non-fatal: the previously published table stays in
/// place and the next tick runs normally.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The store did not answer within the configured bound.
    #[error("store fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    /// The store answered with an error.
    #[error("store fetch failed: {0}")]
    Fetch(#[from] RepositoryError),
}

/// Rebuilds the dispatch table from persisted mappings and publishes it.
pub struct Reconciler {
    store: Arc<dyn MappingStore>,
    dispatch: Arc<DispatchHandle>,
    default_entry: DefaultEntry,
    fetch_timeout: Duration,
    /// Stamp for the next successful build; published tables carry it so
    /// logs can correlate lookups with the generation that served them.
    next_version: u64,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn MappingStore>,
        dispatch: Arc<DispatchHandle>,
        default_entry: DefaultEntry,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            dispatch,
            default_entry,
            fetch_timeout,
            next_version: 1,
        }
    }

    /// Run a single reconciliation pass: fetch enabled mappings, build a
    /// table, publish it.
    ///
    /// Returns the version of the published table. On error nothing is
    /// published and the currently published table remains untouched.
    pub async fn run_once(&mut self) -> Result<u64, ReconcileError> {
        let records = timeout(self.fetch_timeout, self.store.list_enabled())
            .await
            .map_err(|_| ReconcileError::FetchTimeout(self.fetch_timeout))??;

        let version = self.next_version;
        let table = DispatchTable::build(&records, self.default_entry.clone(), version);
        info!(
            version,
            mappings = records.len(),
            entries = table.len(),
            "publishing dispatch table"
        );
        self.dispatch.publish(table);
        self.next_version += 1;
        Ok(version)
    }

    /// Spawn the periodic loop. One pass per `period`; each pass is
    /// independent, so a failed fetch never cancels future ticks.
    ///
    /// Call [`Reconciler::run_once`] before spawning if the very first
    /// request must already see a populated table.
    pub fn spawn(mut self, period: Duration) -> ReconcilerHandle {
        let cancel_token = CancellationToken::new();
        let cancel = cancel_token.clone();

        let join_handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the loop
            // waits one full period after the synchronous startup pass.
            ticker.tick().await;

            debug!(period_secs = period.as_secs(), "reconciliation loop started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(error) = self.run_once().await {
                            warn!(%error, "reconciliation tick failed; keeping previous table");
                        }
                    }
                    () = cancel.cancelled() => {
                        debug!("reconciliation loop cancelled");
                        break;
                    }
                }
            }
        });

        ReconcilerHandle {
            cancel_token,
            join_handle,
        }
    }
}

/// Handle to the running reconciliation loop.
pub struct ReconcilerHandle {
    cancel_token: CancellationToken,
    join_handle: JoinHandle<()>,
}

impl ReconcilerHandle {
    /// Stop the loop: signal cancellation and wait for the task to finish.
    /// Aborts the task if it does not stop within the grace period.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        let mut join = self.join_handle;
        match timeout(SHUTDOWN_GRACE, &mut join).await {
            Ok(Ok(())) => debug!("reconciler stopped cleanly"),
            Ok(Err(join_err)) => warn!("reconciler task panicked: {join_err}"),
            Err(_) => {
                warn!("reconciler stop timed out; aborting task");
                join.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use url::Url;

    use portico_core::MockMappingStore;
    use portico_core::domain::{Mapping, MappingUpdate, NewMapping};

    use super::*;

    fn make_mapping(id: i64, path: &str, target_url: &str) -> Mapping {
        let now = Utc::now();
        Mapping {
            id,
            path: path.to_string(),
            target_url: target_url.to_string(),
            is_enabled: true,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_default() -> DefaultEntry {
        DefaultEntry::new(Url::parse("http://default.internal").unwrap())
    }

    fn make_reconciler(store: Arc<dyn MappingStore>) -> (Reconciler, Arc<DispatchHandle>) {
        let dispatch = Arc::new(DispatchHandle::new(DispatchTable::empty(make_default())));
        let reconciler = Reconciler::new(
            store,
            Arc::clone(&dispatch),
            make_default(),
            Duration::from_secs(1),
        );
        (reconciler, dispatch)
    }

    /// Store whose `list_enabled` never completes, to exercise the fetch bound.
    struct StalledStore;

    #[async_trait]
    impl MappingStore for StalledStore {
        async fn list(&self) -> Result<Vec<Mapping>, RepositoryError> {
            Ok(vec![])
        }

        async fn list_enabled(&self) -> Result<Vec<Mapping>, RepositoryError> {
            std::future::pending().await
        }

        async fn get(&self, id: i64) -> Result<Mapping, RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }

        async fn create(&self, _mapping: &NewMapping) -> Result<Mapping, RepositoryError> {
            unimplemented!()
        }

        async fn update(
            &self,
            id: i64,
            _update: &MappingUpdate,
        ) -> Result<Mapping, RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }
    }

    #[tokio::test]
    async fn test_run_once_publishes_fetched_mappings() {
        let mut store = MockMappingStore::new();
        store.expect_list_enabled().returning(|| {
            Ok(vec![
                make_mapping(1, "/v1/products", "http://internal/products"),
                make_mapping(2, "/v1/orders", "http://internal/orders"),
            ])
        });

        let (mut reconciler, dispatch) = make_reconciler(Arc::new(store));
        let version = reconciler.run_once().await.unwrap();

        assert_eq!(version, 1);
        let table = dispatch.load();
        assert_eq!(table.version(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].prefix, "/v1/products");
    }

    #[tokio::test]
    async fn test_versions_increase_across_passes() {
        let mut store = MockMappingStore::new();
        store
            .expect_list_enabled()
            .returning(|| Ok(vec![make_mapping(1, "/v1", "http://internal/v1")]));

        let (mut reconciler, dispatch) = make_reconciler(Arc::new(store));
        assert_eq!(reconciler.run_once().await.unwrap(), 1);
        assert_eq!(reconciler.run_once().await.unwrap(), 2);
        assert_eq!(dispatch.load().version(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_table() {
        let mut store = MockMappingStore::new();
        let mut calls = 0;
        store.expect_list_enabled().returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![make_mapping(1, "/v1", "http://internal/v1")])
            } else {
                Err(RepositoryError::Storage("store unreachable".to_string()))
            }
        });

        let (mut reconciler, dispatch) = make_reconciler(Arc::new(store));
        reconciler.run_once().await.unwrap();
        let before = dispatch.load();

        let result = reconciler.run_once().await;
        assert!(matches!(result, Err(ReconcileError::Fetch(_))));

        // Same table object: nothing was published.
        let after = dispatch.load();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.version(), 1);
        assert_eq!(after.len(), 1);
    }

    #[tokio::test]
    async fn test_stalled_fetch_times_out_and_keeps_table() {
        let dispatch = Arc::new(DispatchHandle::new(DispatchTable::empty(make_default())));
        let mut reconciler = Reconciler::new(
            Arc::new(StalledStore),
            Arc::clone(&dispatch),
            make_default(),
            Duration::from_millis(50),
        );

        let result = reconciler.run_once().await;
        assert!(matches!(result, Err(ReconcileError::FetchTimeout(_))));
        assert_eq!(dispatch.load().version(), 0);
    }

    #[tokio::test]
    async fn test_spawned_loop_publishes_on_tick_and_stops_on_shutdown() {
        let mut store = MockMappingStore::new();
        store
            .expect_list_enabled()
            .returning(|| Ok(vec![make_mapping(1, "/v1", "http://internal/v1")]));

        let (reconciler, dispatch) = make_reconciler(Arc::new(store));
        let handle = reconciler.spawn(Duration::from_millis(20));

        // Wait for at least one tick to land.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while dispatch.load().version() == 0 {
            assert!(tokio::time::Instant::now() < deadline, "no tick published");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        handle.shutdown().await;

        // No further publications after shutdown.
        let version = dispatch.load().version();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(dispatch.load().version(), version);
    }

    #[tokio::test]
    async fn test_failing_tick_does_not_cancel_future_ticks() {
        let mut store = MockMappingStore::new();
        let mut calls = 0;
        store.expect_list_enabled().returning(move || {
            calls += 1;
            if calls == 1 {
                Err(RepositoryError::Storage("flaky".to_string()))
            } else {
                Ok(vec![make_mapping(1, "/v1", "http://internal/v1")])
            }
        });

        let (reconciler, dispatch) = make_reconciler(Arc::new(store));
        let handle = reconciler.spawn(Duration::from_millis(20));

        // The first tick fails; a later one must still publish.
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while dispatch.load().version() == 0 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "loop never recovered from failed tick"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        handle.shutdown().await;
    }
}
