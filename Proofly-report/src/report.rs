use thiserror::Error;
use tracing::{debug, info, warn};

use proofly_data::repository::SnapshotRepository;
use proofly_domain::entities::conversions::{convert_to_domain_record, convert_to_domain_schedule};
use proofly_domain::entities::{CheckupSchedule, HealthScore, MetricRecord, MetricStatistics, NextCheckupView, Prediction};
use proofly_domain::services::catalog::display_label;
use proofly_domain::services::{HealthSignalError, HealthSignalServiceTrait};

use crate::entities::{
    DashboardReport, PublicHealthScore, PublicMetricStatistics, PublicNextCheckup, PublicPrediction,
};

/// Report assembly errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// A derivation failed
    #[error("Health signal error: {0}")]
    Signal(#[from] HealthSignalError),

    /// The report could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build the dashboard report for a snapshot.
///
/// Documents that cannot be read are logged and left out rather than failing
/// the whole report.
pub fn build_report<S>(repository: &SnapshotRepository, service: &S) -> Result<DashboardReport, ReportError>
where
    S: HealthSignalServiceTrait + ?Sized,
{
    let mut skipped_documents = 0;

    let records: Vec<MetricRecord> = repository
        .all_metrics()
        .iter()
        .cloned()
        .filter_map(|doc| match convert_to_domain_record(doc) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping metric document: {}", err);
                skipped_documents += 1;
                None
            }
        })
        .collect();

    let schedules: Vec<CheckupSchedule> = repository
        .all_schedules()
        .iter()
        .cloned()
        .filter_map(|doc| match convert_to_domain_schedule(doc) {
            Ok(schedule) => Some(schedule),
            Err(err) => {
                warn!("Skipping schedule document: {}", err);
                skipped_documents += 1;
                None
            }
        })
        .collect();

    debug!(
        "Building report from {} readings and {} schedules",
        records.len(),
        schedules.len()
    );

    let statistics = service.compute_statistics(&records)?;
    let predictions = service.predictions(&records)?;
    let health_score = service.health_score(&records)?;
    let recommendation = service.recommend_next_checkup(&records)?;
    let view = service.next_checkup_view(&schedules, &recommendation);

    let report = DashboardReport {
        generated_at: service.now(),
        statistics: statistics.into_values().map(convert_to_public_statistics).collect(),
        predictions: predictions.into_iter().map(convert_to_public_prediction).collect(),
        health_score: convert_to_public_health_score(health_score),
        next_checkup: convert_to_public_next_checkup(view),
        skipped_documents,
    };

    info!(
        "Report ready: {} metric types, {} predictions, {} checkup, {} documents skipped",
        report.statistics.len(),
        report.predictions.len(),
        report.next_checkup.urgency,
        report.skipped_documents
    );

    Ok(report)
}

/// Pretty JSON for a report
pub fn render_report(report: &DashboardReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn trend_caption(stats: &MetricStatistics) -> String {
    format!(
        "Metric value shows {} by {}% today",
        stats.trend_direction().phrase(),
        stats.trend_percent.abs()
    )
}

fn convert_to_public_statistics(stats: MetricStatistics) -> PublicMetricStatistics {
    PublicMetricStatistics {
        label: display_label(&stats.metric_type),
        trend_caption: trend_caption(&stats),
        metric_type: stats.metric_type,
        min: stats.min,
        max: stats.max,
        average: stats.average,
        last_value: stats.last_value,
        trend_percent: stats.trend_percent,
        record_count: stats.record_count,
    }
}

fn convert_to_public_prediction(prediction: Prediction) -> PublicPrediction {
    PublicPrediction {
        id: prediction.id,
        title: prediction.title,
        prediction: prediction.prediction,
        confidence: prediction.confidence,
        risk: prediction.risk.to_string(),
    }
}

fn convert_to_public_health_score(score: HealthScore) -> PublicHealthScore {
    PublicHealthScore {
        score: score.score,
        level: score.level,
        assessed_count: score.assessed_count,
    }
}

fn convert_to_public_next_checkup(view: NextCheckupView) -> PublicNextCheckup {
    PublicNextCheckup {
        next_checkup: view.next_checkup,
        last_checkup: view.last_checkup,
        days_until_next: view.days_until_next,
        progress_percent: view.progress_percent,
        recommended_date: view.recommendation.recommended_date,
        urgency: view.recommendation.urgency.to_string(),
        days_to_add: view.recommendation.days_to_add,
        badge_label: view.badge.label,
        badge_style: view.badge.style_hint,
        guidance: view.guidance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(trend_percent: f64) -> MetricStatistics {
        MetricStatistics {
            metric_type: "heartRate".to_string(),
            min: 60.0,
            max: 80.0,
            average: 70.0,
            last_value: 80.0,
            trend_percent,
            record_count: 3,
        }
    }

    #[test]
    fn test_trend_caption() {
        assert_eq!(trend_caption(&stats(4.2)), "Metric value shows an increase by 4.2% today");
        assert_eq!(trend_caption(&stats(-12.5)), "Metric value shows a decrease by 12.5% today");
        assert_eq!(trend_caption(&stats(0.0)), "Metric value shows an increase by 0% today");
    }

    #[test]
    fn test_report_error_wraps_signal_error() {
        let err = ReportError::from(HealthSignalError::Validation("bad reading".to_string()));
        assert!(matches!(err, ReportError::Signal(_)));
        assert_eq!(err.to_string(), "Health signal error: Validation error: bad reading");
    }

    #[test]
    fn test_public_statistics_label() {
        let public = convert_to_public_statistics(stats(1.0));
        assert_eq!(public.label, "heart rate (hypertension, chf)");
        assert_eq!(public.metric_type, "heartRate");
    }
}
