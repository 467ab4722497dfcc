//! Composition root for the evaluation core.
//!
//! Owns the rule cache, the sync loop and the scheduler loop. Everything is
//! explicitly constructed and dependency-injected; lifecycle is tied to
//! [`Engine::start`] / [`Engine::shutdown`] rather than process-wide
//! singletons.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::{CacheSyncer, RuleCache};
use crate::error::CoreError;
use crate::metrics::MetricsHandle;
use crate::naming::LeaderHandle;
use crate::notify::NotifierHandle;
use crate::reader::ReaderHandle;
use crate::store::StoreHandle;
use crate::supervisor::WorkerSupervisor;
use crate::writer::SinkHandle;

/// Cadence of the cache-sync timer.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(9000);

/// Cadence of the reconciliation timer.
pub const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_millis(9000);

/// Engine settings.
///
/// An empty `cluster` disables scope filtering at the store.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub cluster: String,
    pub sync_interval: Duration,
    pub reconcile_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster: String::new(),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            reconcile_interval: DEFAULT_RECONCILE_INTERVAL,
        }
    }
}

/// External collaborators injected into the engine.
///
/// `leader` is the optional policy point: when absent, every reconciliation
/// tick runs; when present, only leader ticks do.
#[derive(Clone)]
pub struct Collaborators {
    pub store: StoreHandle,
    pub reader: ReaderHandle,
    pub writer: SinkHandle,
    pub notifier: NotifierHandle,
    pub leader: Option<LeaderHandle>,
    pub metrics: MetricsHandle,
}

/// Running evaluation core.
///
/// Construction performs the initial cache refresh and fails hard if the
/// store is unreachable: the process must not run on an empty, unverified
/// cache. After that both loops absorb their own errors.
pub struct Engine {
    cache: Arc<RuleCache>,
    root: CancellationToken,
    sync_loop: JoinHandle<()>,
    scheduler_loop: JoinHandle<()>,
}

impl Engine {
    /// Refresh the cache once (fatal on failure), then start the sync loop
    /// and the reconciliation scheduler in the background.
    pub async fn start(cfg: EngineConfig, deps: Collaborators) -> Result<Self, CoreError> {
        let cache = Arc::new(RuleCache::new());

        let mut syncer = CacheSyncer::new(
            cache.clone(),
            deps.store,
            cfg.cluster.clone(),
            deps.metrics.clone(),
        );
        syncer.refresh().await?;

        let root = CancellationToken::new();
        let sync_loop = tokio::spawn(syncer.run(cfg.sync_interval, root.child_token()));

        let supervisor = WorkerSupervisor::new(
            cache.clone(),
            deps.reader,
            deps.writer,
            deps.notifier,
            deps.metrics,
        );
        let scheduler_loop = tokio::spawn(supervisor.run(
            cfg.reconcile_interval,
            deps.leader,
            root.child_token(),
        ));

        info!(cluster = %cfg.cluster, "recording engine started");
        Ok(Self {
            cache,
            root,
            sync_loop,
            scheduler_loop,
        })
    }

    /// Shared view of the rule cache.
    pub fn cache(&self) -> Arc<RuleCache> {
        self.cache.clone()
    }

    /// Stop both loops and every running evaluation task, waiting for each
    /// to observe the signal.
    pub async fn shutdown(self) {
        self.root.cancel();
        let _ = self.sync_loop.await;
        let _ = self.scheduler_loop.await;
        info!("recording engine stopped");
    }
}
