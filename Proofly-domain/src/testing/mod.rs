// Testing utilities and fixture builders for the domain layer
// This module is only available when the "mock" feature is enabled

use chrono::{DateTime, Duration, Utc};

use crate::config::ProoflyConfig;
use crate::entities::checkup::{CheckupSchedule, UrgencyTier};
use crate::entities::conversions::{convert_to_data_metric, convert_to_data_schedule};
use crate::entities::metric::MetricRecord;
use crate::services::clock::FixedClock;
use crate::services::errors::HealthSignalError;
use crate::services::health_signal::HealthSignalService;
use proofly_data::models::Snapshot;
use proofly_data::repository::SnapshotRepository;

/// A reading with a readable id
pub fn metric_record(id: &str, metric_type: &str, value: f64, timestamp: DateTime<Utc>) -> MetricRecord {
    MetricRecord {
        id: id.to_string(),
        metric_type: metric_type.to_string(),
        value,
        unit: String::new(),
        timestamp,
        notes: None,
    }
}

/// One reading per day ending at `end`, oldest first
pub fn daily_series(metric_type: &str, values: &[f64], end: DateTime<Utc>) -> Vec<MetricRecord> {
    let count = values.len() as i64;
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let timestamp = end - Duration::days(count - 1 - index as i64);
            metric_record(&format!("{}-{}", metric_type, index), metric_type, *value, timestamp)
        })
        .collect()
}

/// A confirmed checkup on `date`
pub fn checkup_schedule(id: &str, date: DateTime<Utc>, urgency: UrgencyTier) -> CheckupSchedule {
    CheckupSchedule {
        id: id.to_string(),
        date,
        urgency,
        recommended_date: None,
        created_at: date - Duration::days(7),
    }
}

/// Snapshot document holding the given entities
pub fn snapshot(records: &[MetricRecord], schedules: &[CheckupSchedule]) -> Snapshot {
    Snapshot {
        metrics: records.iter().map(convert_to_data_metric).collect(),
        schedules: schedules.iter().map(convert_to_data_schedule).collect(),
    }
}

/// Snapshot serialized the way the document store delivers it
pub fn snapshot_json(records: &[MetricRecord], schedules: &[CheckupSchedule]) -> String {
    serde_json::to_string(&snapshot(records, schedules)).unwrap_or_default()
}

/// Repository over the given entities
pub fn snapshot_repository(
    records: &[MetricRecord],
    schedules: &[CheckupSchedule],
) -> Result<SnapshotRepository, HealthSignalError> {
    Ok(SnapshotRepository::new(snapshot(records, schedules))?)
}

/// Service with default settings pinned to `now`
pub fn fixed_service(now: DateTime<Utc>) -> HealthSignalService<FixedClock> {
    HealthSignalService::new(ProoflyConfig::default(), FixedClock(now))
}
