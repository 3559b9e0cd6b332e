pub mod metric;
pub mod schedule;
pub mod timestamp;

pub use metric::{DocumentValue, MetricDocument};
pub use schedule::ScheduleDocument;
pub use timestamp::DocumentTimestamp;

use serde::{Deserialize, Serialize};

/// A point-in-time copy of one account's collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Documents from the metrics collection
    #[serde(default)]
    pub metrics: Vec<MetricDocument>,

    /// Documents from the schedules collection
    #[serde(default)]
    pub schedules: Vec<ScheduleDocument>,
}
