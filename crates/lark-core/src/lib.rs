mod error;
pub use error::{CoreError, LeaderError, QueryError, StoreError};

mod cache;
pub use cache::{CacheSyncer, Fingerprint, OP_SYNC_RECORD_RULES, RuleCache};

mod ident;
pub use ident::{WorkerIdentity, worker_identity};

mod eval;
pub use eval::RuleEval;

mod supervisor;
pub use supervisor::WorkerSupervisor;

mod engine;
pub use engine::{
    Collaborators, DEFAULT_RECONCILE_INTERVAL, DEFAULT_SYNC_INTERVAL, Engine, EngineConfig,
};

pub mod metrics;
pub use metrics::{EvalOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};

mod store;
pub use store::{RuleStore, StoreHandle};

mod reader;
pub use reader::{QueryBackend, QueryOutcome, ReaderHandle};

mod writer;
pub use writer::{SampleSink, SinkHandle};

mod naming;
pub use naming::{LeaderElect, LeaderHandle};

mod notify;
pub use notify::{Notifier, NotifierHandle};

#[cfg(test)]
mod testutil;

pub mod prelude {
    pub use crate::engine::{Collaborators, Engine, EngineConfig};
    pub use crate::error::{CoreError, LeaderError, QueryError, StoreError};
    pub use crate::metrics::{MetricsBackend, MetricsHandle, noop_metrics};
    pub use crate::naming::LeaderElect;
    pub use crate::notify::Notifier;
    pub use crate::reader::{QueryBackend, QueryOutcome};
    pub use crate::store::RuleStore;
    pub use crate::writer::SampleSink;
}
