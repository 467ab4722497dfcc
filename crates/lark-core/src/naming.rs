use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LeaderError;

/// Cluster-membership leadership predicate.
///
/// Optional policy point: when configured, reconciliation runs only while
/// this process is the leader. A predicate error skips the tick, it does
/// not stop the scheduler.
#[async_trait]
pub trait LeaderElect: Send + Sync {
    async fn is_leader(&self) -> Result<bool, LeaderError>;
}

/// Shared handle to a leadership predicate.
pub type LeaderHandle = Arc<dyn LeaderElect>;
