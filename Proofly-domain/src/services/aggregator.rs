//! Per-type statistics over a window of readings

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::entities::metric::{MetricRecord, MetricStatistics};
use crate::services::errors::{ensure_finite, HealthSignalError};

/// Round to one decimal place. Values too large to scale are returned as is.
pub fn round_to_tenth(value: f64) -> f64 {
    let scaled = value * 10.0;
    if scaled.is_finite() {
        scaled.round() / 10.0
    } else {
        value
    }
}

/// Compute statistics for every metric type in the window.
///
/// Readings are put in timestamp order first (ties keep their input order),
/// then the `window_size` most recent readings are grouped by their literal
/// type key. The map follows the order in which each type first appears in
/// the window.
pub fn compute_statistics(
    records: &[MetricRecord],
    window_size: usize,
) -> Result<IndexMap<String, MetricStatistics>, HealthSignalError> {
    for record in records {
        ensure_finite(&record.metric_type, record.value)?;
    }

    let mut ordered: Vec<&MetricRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp);
    let window = &ordered[ordered.len().saturating_sub(window_size)..];

    let mut partitions: IndexMap<&str, Vec<f64>> = IndexMap::new();
    for record in window {
        partitions
            .entry(record.metric_type.as_str())
            .or_default()
            .push(record.value);
    }

    debug!(
        "Computing statistics for {} types over {} of {} readings",
        partitions.len(),
        window.len(),
        records.len()
    );

    Ok(partitions
        .into_iter()
        .map(|(metric_type, values)| (metric_type.to_string(), summarize(metric_type, &values)))
        .collect())
}

fn summarize(metric_type: &str, values: &[f64]) -> MetricStatistics {
    let Some(&last_value) = values.last() else {
        return MetricStatistics {
            metric_type: metric_type.to_string(),
            min: 0.0,
            max: 0.0,
            average: 0.0,
            last_value: 0.0,
            trend_percent: 0.0,
            record_count: 0,
        };
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    MetricStatistics {
        metric_type: metric_type.to_string(),
        min,
        max,
        average: round_to_tenth(mean(values)),
        last_value,
        trend_percent: trend_percent(metric_type, values),
        record_count: values.len(),
    }
}

/// Mean of finite values. Falls back to summing `v / n` when the plain sum
/// overflows.
fn mean(values: &[f64]) -> f64 {
    let count = values.len() as f64;
    let sum: f64 = values.iter().sum();
    if sum.is_finite() {
        sum / count
    } else {
        values.iter().map(|value| value / count).sum()
    }
}

/// Percent change between the last two values.
/// A zero previous value, or a change too large to represent, reports 0.
fn trend_percent(metric_type: &str, values: &[f64]) -> f64 {
    match values {
        [.., previous, last] => {
            if *previous == 0.0 {
                warn!("Previous {} reading is zero, reporting a flat trend", metric_type);
                return 0.0;
            }

            let change = (last - previous) / previous * 100.0;
            if change.is_finite() {
                round_to_tenth(change)
            } else {
                warn!(
                    "{} trend from {} to {} is out of range, reporting a flat trend",
                    metric_type, previous, last
                );
                0.0
            }
        }
        _ => 0.0,
    }
}
