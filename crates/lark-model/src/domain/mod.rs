mod labels;
pub use labels::Labels;

mod constants;
pub use constants::{METRIC_NAME_LABEL, RUNTIME_INTERVAL_FLOOR_SECS, STORED_INTERVAL_FLOOR_SECS};

/// Persisted identifier of a recording rule.
///
/// Assigned by the backing store and immutable once created.
pub type RuleId = i64;
