//! Common model-level constants.
//!
//! Well-known label keys and interval floors used across the model and core
//! layers. Keeping them here avoids scattering magic values throughout the
//! codebase.

/// Reserved label key carrying the metric name of a series.
///
/// The evaluation core overwrites this key on every emitted series with the
/// rule's configured output metric name.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Minimum evaluation interval accepted when a rule is validated/stored.
///
/// A rule submitted with a smaller (or equal) interval is stored with this
/// value instead. Distinct from [`RUNTIME_INTERVAL_FLOOR_SECS`]: both floors
/// are enforced independently.
pub const STORED_INTERVAL_FLOOR_SECS: i64 = 15;

/// Minimum sleep between two evaluation cycles of a running task.
///
/// Applied at run time regardless of what the store holds, so a rule
/// persisted with a smaller interval still sleeps this long.
pub const RUNTIME_INTERVAL_FLOOR_SECS: i64 = 10;
