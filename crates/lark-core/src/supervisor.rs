//! Reconciliation of running evaluation tasks against the rule cache.
//!
//! [`WorkerSupervisor`] owns the running-task set exclusively: one scheduler
//! loop drives it, so the set needs no lock. Each reconciliation pass is a
//! full diff keyed by worker identity, not rule id. Diffing issues the
//! minimal start/stop actions and never mutates a running task in place.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::RuleCache;
use crate::eval::RuleEval;
use crate::ident::{WorkerIdentity, worker_identity};
use crate::metrics::MetricsHandle;
use crate::naming::LeaderHandle;
use crate::notify::NotifierHandle;
use crate::reader::ReaderHandle;
use crate::writer::SinkHandle;
use lark_model::{RecordRule, RuleId};

/// Live handle to one spawned evaluation task.
struct EvalHandle {
    rule_id: RuleId,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl EvalHandle {
    /// Signal the task to exit at its next check point.
    ///
    /// Called exactly once, immediately before removal from the set.
    fn stop(&self) {
        info!(rule_id = self.rule_id, "rule eval stopping");
        self.cancel.cancel();
    }
}

/// Keeps the running-task population congruent with the desired rule set.
pub struct WorkerSupervisor {
    cache: Arc<RuleCache>,
    reader: ReaderHandle,
    writer: SinkHandle,
    notifier: NotifierHandle,
    metrics: MetricsHandle,
    running: HashMap<WorkerIdentity, EvalHandle>,
}

impl WorkerSupervisor {
    pub fn new(
        cache: Arc<RuleCache>,
        reader: ReaderHandle,
        writer: SinkHandle,
        notifier: NotifierHandle,
        metrics: MetricsHandle,
    ) -> Self {
        Self {
            cache,
            reader,
            writer,
            notifier,
            metrics,
            running: HashMap::new(),
        }
    }

    /// Identities of all currently running tasks, order unspecified.
    pub fn running_identities(&self) -> Vec<WorkerIdentity> {
        self.running.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// One full reconciliation pass over the given rule ids.
    ///
    /// Ids with no cached definition are skipped (deleted or disabled since
    /// the id snapshot was taken, not an error). Running identities absent
    /// from the desired set are stopped and removed; desired identities not
    /// yet running are started; intersections are left untouched, so a
    /// running task keeps its original parameters even if only its append
    /// tags changed.
    pub fn reconcile(&mut self, ids: &[RuleId]) {
        let mut desired: HashMap<WorkerIdentity, Arc<RecordRule>> =
            HashMap::with_capacity(ids.len());
        for id in ids {
            let Some(rule) = self.cache.get(*id) else {
                continue;
            };
            // duplicate identities collapse here, last write wins
            desired.insert(worker_identity(&rule), rule);
        }

        // stop old
        self.running.retain(|ident, handle| {
            if desired.contains_key(ident) {
                return true;
            }
            handle.stop();
            false
        });

        // start new
        for (ident, rule) in desired {
            if self.running.contains_key(&ident) {
                continue;
            }
            let handle = self.start(rule);
            self.running.insert(ident, handle);
        }
    }

    fn start(&self, rule: Arc<RecordRule>) -> EvalHandle {
        let eval = RuleEval::new(
            rule,
            self.reader.clone(),
            self.writer.clone(),
            self.notifier.clone(),
            self.metrics.clone(),
        );
        let rule_id = eval.rule_id();
        let cancel = CancellationToken::new();
        let join = tokio::spawn(eval.run(cancel.clone()));
        EvalHandle {
            rule_id,
            cancel,
            join,
        }
    }

    /// Stop every running task and wait for each to exit.
    pub async fn shutdown(&mut self) {
        for (_, handle) in self.running.drain() {
            handle.stop();
            let _ = handle.join.await;
        }
    }

    /// Timer-driven reconciliation loop.
    ///
    /// Each tick consults the leadership predicate when one is configured:
    /// non-leader ticks and predicate errors skip the pass entirely. On
    /// cancellation every running task is stopped before returning.
    pub async fn run(
        mut self,
        interval: Duration,
        leader: Option<LeaderHandle>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately; reconciliation waits one
        // full interval like every later pass
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Some(leader) = &leader {
                        match leader.is_leader().await {
                            Ok(true) => {}
                            Ok(false) => {
                                debug!("not leader, skip reconciliation");
                                continue;
                            }
                            Err(e) => {
                                error!(error = %e, "failed to check leadership");
                                continue;
                            }
                        }
                    }
                    let ids = self.cache.rule_ids();
                    self.reconcile(&ids);
                }
            }
        }

        self.shutdown().await;
    }
}
