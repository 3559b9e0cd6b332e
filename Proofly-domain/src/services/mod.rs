pub mod aggregator;
pub mod catalog;
pub mod classifier;
pub mod clock;
pub mod errors;
pub mod health_signal;
pub mod scheduler;

// Domain services
// Pure derivations over readings and schedules, plus the facade that ties
// them to configuration and a clock.

use crate::entities::metric::MetricRecord;

// Re-export service traits and factory functions
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::HealthSignalError;
pub use health_signal::{create_default_health_signal_service, HealthSignalService, HealthSignalServiceTrait};
pub use scheduler::{CheckupScheduler, UrgencyAggregation};

// Re-export fixture service factory when the mock feature is enabled
#[cfg(feature = "mock")]
pub use health_signal::create_fixed_health_signal_service;

/// The `limit` newest readings, newest first. Equal timestamps keep input order.
pub(crate) fn most_recent(records: &[MetricRecord], limit: usize) -> Vec<&MetricRecord> {
    let mut ordered: Vec<&MetricRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    ordered.truncate(limit);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(id: &str, hour: i64) -> MetricRecord {
        MetricRecord {
            id: id.to_string(),
            metric_type: "heartRate".to_string(),
            value: 70.0,
            unit: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
            notes: None,
        }
    }

    #[test]
    fn test_most_recent_orders_and_limits() {
        let records = vec![record("a", 1), record("b", 3), record("c", 2), record("d", 3)];
        let ids: Vec<&str> = most_recent(&records, 3).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "c"]);
        assert!(most_recent(&records, 0).is_empty());
    }
}
