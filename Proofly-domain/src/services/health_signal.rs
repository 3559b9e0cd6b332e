use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::ProoflyConfig;
use crate::entities::checkup::{CheckupRecommendation, CheckupSchedule, NextCheckupView, UrgencyBadge, UrgencyTier};
use crate::entities::metric::{MetricRecord, MetricStatistics};
use crate::entities::risk::{HealthScore, Prediction, RiskAssessment};
use crate::services::aggregator;
use crate::services::catalog::{self, NewMetricRequest};
use crate::services::classifier;
use crate::services::clock::{Clock, SystemClock};
use crate::services::errors::HealthSignalError;
use crate::services::scheduler::{self, CheckupScheduler};

/// Trait for health-signal operations
pub trait HealthSignalServiceTrait {
    /// Settings the service was built with
    fn config(&self) -> &ProoflyConfig;

    /// The instant date math is computed against
    fn now(&self) -> DateTime<Utc>;

    /// Per-type statistics over the configured window
    fn compute_statistics(
        &self,
        records: &[MetricRecord],
    ) -> Result<IndexMap<String, MetricStatistics>, HealthSignalError>;

    /// Classify a single reading
    fn classify(&self, metric_type: &str, value: f64) -> Result<Option<RiskAssessment>, HealthSignalError>;

    /// Prediction cards for the most recent readings
    fn predictions(&self, records: &[MetricRecord]) -> Result<Vec<Prediction>, HealthSignalError>;

    /// Overall health score for the most recent readings
    fn health_score(&self, records: &[MetricRecord]) -> Result<HealthScore, HealthSignalError>;

    /// Recommend the next checkup
    fn recommend_next_checkup(&self, records: &[MetricRecord]) -> Result<CheckupRecommendation, HealthSignalError>;

    /// Whole days until `date`, rounded up
    fn days_until(&self, date: DateTime<Utc>) -> i64;

    /// Badge for an urgency tier
    fn urgency_badge(&self, urgency: UrgencyTier) -> UrgencyBadge;

    /// Confirm a checkup on `date`
    fn schedule_checkup(
        &self,
        date: DateTime<Utc>,
        recommendation: &CheckupRecommendation,
    ) -> Result<CheckupSchedule, HealthSignalError>;

    /// Next-checkup card for the schedule history
    fn next_checkup_view(&self, schedules: &[CheckupSchedule], recommendation: &CheckupRecommendation) -> NextCheckupView;

    /// Validate an entered reading and stamp it with the current instant
    fn build_record(&self, request: &NewMetricRequest) -> Result<MetricRecord, HealthSignalError>;
}

/// Health-signal service bundling settings and a clock
#[derive(Debug, Clone)]
pub struct HealthSignalService<C: Clock> {
    config: ProoflyConfig,
    scheduler: CheckupScheduler<C>,
}

impl<C: Clock> HealthSignalService<C> {
    /// Create a new health-signal service
    pub fn new(config: ProoflyConfig, clock: C) -> Self {
        let scheduler = CheckupScheduler::new(clock, config.urgency_aggregation);
        Self { config, scheduler }
    }
}

impl<C: Clock> HealthSignalServiceTrait for HealthSignalService<C> {
    fn config(&self) -> &ProoflyConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.scheduler.now()
    }

    fn compute_statistics(
        &self,
        records: &[MetricRecord],
    ) -> Result<IndexMap<String, MetricStatistics>, HealthSignalError> {
        aggregator::compute_statistics(records, self.config.statistics_window)
    }

    fn classify(&self, metric_type: &str, value: f64) -> Result<Option<RiskAssessment>, HealthSignalError> {
        classifier::classify(metric_type, value)
    }

    fn predictions(&self, records: &[MetricRecord]) -> Result<Vec<Prediction>, HealthSignalError> {
        classifier::predictions(records, self.config.prediction_limit)
    }

    fn health_score(&self, records: &[MetricRecord]) -> Result<HealthScore, HealthSignalError> {
        classifier::health_score(records, self.config.health_score_lookback)
    }

    fn recommend_next_checkup(&self, records: &[MetricRecord]) -> Result<CheckupRecommendation, HealthSignalError> {
        self.scheduler.recommend_next_checkup(records, self.config.checkup_lookback)
    }

    fn days_until(&self, date: DateTime<Utc>) -> i64 {
        self.scheduler.days_until(date)
    }

    fn urgency_badge(&self, urgency: UrgencyTier) -> UrgencyBadge {
        scheduler::urgency_badge(urgency)
    }

    fn schedule_checkup(
        &self,
        date: DateTime<Utc>,
        recommendation: &CheckupRecommendation,
    ) -> Result<CheckupSchedule, HealthSignalError> {
        let schedule = self.scheduler.schedule_checkup(date, recommendation)?;
        info!("Scheduled {} checkup {} for {}", schedule.urgency, schedule.id, schedule.date.to_rfc3339());
        Ok(schedule)
    }

    fn next_checkup_view(&self, schedules: &[CheckupSchedule], recommendation: &CheckupRecommendation) -> NextCheckupView {
        self.scheduler.next_checkup_view(schedules, recommendation)
    }

    fn build_record(&self, request: &NewMetricRequest) -> Result<MetricRecord, HealthSignalError> {
        catalog::build_record(request, self.scheduler.now())
    }
}

/// Create a service from the environment and the wall clock.
/// Unusable settings fall back to the defaults.
pub fn create_default_health_signal_service() -> impl HealthSignalServiceTrait {
    let config = ProoflyConfig::from_env().unwrap_or_else(|err| {
        warn!("{}, using default settings", err);
        ProoflyConfig::default()
    });
    HealthSignalService::new(config, SystemClock)
}

/// Create a service pinned to one instant for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_fixed_health_signal_service(
    config: ProoflyConfig,
    now: DateTime<Utc>,
) -> HealthSignalService<crate::services::clock::FixedClock> {
    HealthSignalService::new(config, crate::services::clock::FixedClock(now))
}
