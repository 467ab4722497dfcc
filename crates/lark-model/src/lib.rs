mod domain;
pub use domain::{METRIC_NAME_LABEL, RUNTIME_INTERVAL_FLOOR_SECS, STORED_INTERVAL_FLOOR_SECS};
pub use domain::{Labels, RuleId};

mod error;
pub use error::{ModelError, ModelResult};

mod rule;
pub use rule::{RecordRule, RuleStatistics};

mod series;
pub use series::{InstantSample, QueryValue, Sample, TimeSeries};
