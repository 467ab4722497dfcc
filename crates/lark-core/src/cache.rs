//! In-memory snapshot of enabled recording rules.
//!
//! - [`RuleCache`] serves point-in-time reads to the scheduler and tasks.
//! - [`CacheSyncer`] refreshes it from the backing store on a fixed timer,
//!   skipping the full reload when the population fingerprint is unchanged.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::metrics::MetricsHandle;
use crate::store::StoreHandle;
use lark_model::{RecordRule, RuleId, RuleStatistics};

/// Operation label used for sync metrics.
pub const OP_SYNC_RECORD_RULES: &str = "sync_record_rules";

/// Thread-safe snapshot of enabled rule definitions keyed by id.
///
/// The mapping behind the lock is an `Arc` that the writer replaces as a
/// whole, so concurrent readers observe either the old or the new snapshot
/// atomically, never a partial one.
pub struct RuleCache {
    rules: RwLock<Arc<HashMap<RuleId, Arc<RecordRule>>>>,
}

impl RuleCache {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Look up a rule by id.
    pub fn get(&self, id: RuleId) -> Option<Arc<RecordRule>> {
        self.snapshot().get(&id).cloned()
    }

    /// Snapshot of all currently cached ids, order unspecified.
    pub fn rule_ids(&self) -> Vec<RuleId> {
        self.snapshot().keys().copied().collect()
    }

    /// Current mapping snapshot.
    ///
    /// The returned `Arc` keeps its identity across no-op refreshes, which
    /// is what makes fingerprint stability observable.
    pub fn snapshot(&self) -> Arc<HashMap<RuleId, Arc<RecordRule>>> {
        Arc::clone(
            &self
                .rules
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Atomically replace the whole mapping.
    pub fn replace(&self, rules: HashMap<RuleId, Arc<RecordRule>>) {
        *self
            .rules
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(rules);
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap change detector over the enabled-rule population.
///
/// Starts at `(-1, -1)` so the very first poll always reads the full list.
/// If neither the count nor the max `updated_at` moved between two polls,
/// the population and content are assumed unchanged; no per-row diff is
/// attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    total: i64,
    last_updated: i64,
}

impl Fingerprint {
    pub fn changed(&self, stats: &RuleStatistics) -> bool {
        self.total != stats.total || self.last_updated != stats.last_updated
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self {
            total: -1,
            last_updated: -1,
        }
    }
}

/// Single-owner refresher for a [`RuleCache`].
///
/// Exactly one execution context calls [`CacheSyncer::refresh`], so the
/// fingerprint lives here unsynchronized; only the cache mapping itself is
/// behind a lock.
pub struct CacheSyncer {
    cache: Arc<RuleCache>,
    store: StoreHandle,
    cluster: String,
    fingerprint: Fingerprint,
    metrics: MetricsHandle,
}

impl CacheSyncer {
    pub fn new(
        cache: Arc<RuleCache>,
        store: StoreHandle,
        cluster: impl Into<String>,
        metrics: MetricsHandle,
    ) -> Self {
        Self {
            cache,
            store,
            cluster: cluster.into(),
            fingerprint: Fingerprint::default(),
            metrics,
        }
    }

    /// Run one refresh pass.
    ///
    /// Polls store statistics first and only fetches the full enabled-rule
    /// list when the fingerprint moved, atomically replacing the cached
    /// mapping on success. A pass with an unchanged fingerprint records
    /// zero-valued sync metrics and leaves the mapping untouched.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        let started = Instant::now();

        let stats = self.store.statistics(&self.cluster).await?;
        if !self.fingerprint.changed(&stats) {
            self.metrics
                .record_sync(&self.cluster, OP_SYNC_RECORD_RULES, 0, 0);
            return Ok(());
        }

        let rules = self.store.enabled_rules(&self.cluster).await?;
        let mapping: HashMap<RuleId, Arc<RecordRule>> = rules
            .into_iter()
            .map(|rule| (rule.id, Arc::new(rule)))
            .collect();
        let count = mapping.len();

        self.cache.replace(mapping);
        self.fingerprint = Fingerprint {
            total: stats.total,
            last_updated: stats.last_updated,
        };

        let cost_ms = started.elapsed().as_millis() as u64;
        self.metrics
            .record_sync(&self.cluster, OP_SYNC_RECORD_RULES, cost_ms, count as u64);
        info!(cost_ms, count, "recording rules synced");
        Ok(())
    }

    /// Timer-driven refresh loop.
    ///
    /// The initial refresh happens at engine start (where a failure is
    /// fatal); here every failure is logged and retried on the next tick.
    pub async fn run(mut self, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately and the startup refresh
        // already ran, so consume it before entering the loop
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "failed to sync recording rules");
                    }
                }
            }
        }
    }
}
