use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use lark_model::{RecordRule, RuleStatistics};

/// Durable store of recording-rule definitions.
///
/// The core never writes through this trait; CRUD and validation belong to
/// the store's own surface. An empty `cluster` means no scope filter.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Cheap population summary used for the fingerprint check.
    async fn statistics(&self, cluster: &str) -> Result<RuleStatistics, StoreError>;

    /// Full list of enabled rules in scope.
    ///
    /// Only fetched when [`RuleStore::statistics`] reports a change.
    async fn enabled_rules(&self, cluster: &str) -> Result<Vec<RecordRule>, StoreError>;
}

/// Shared handle to a rule store.
pub type StoreHandle = Arc<dyn RuleStore>;
