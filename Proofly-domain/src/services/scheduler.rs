//! Checkup recommendations and schedule views

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use crate::entities::checkup::{
    CheckupRecommendation, CheckupSchedule, NextCheckupView, UrgencyBadge, UrgencyTier,
};
use crate::entities::metric::{MetricRecord, MetricType};
use crate::services::clock::Clock;
use crate::services::errors::{ensure_finite, HealthSignalError};
use crate::services::most_recent;

/// Readings considered for a recommendation unless told otherwise
pub const DEFAULT_LOOKBACK: usize = 10;

/// Days until a checkup when nothing is flagged
pub const ROUTINE_INTERVAL_DAYS: i64 = 30;

/// Days until a checkup when a reading is flagged soon
pub const SOON_INTERVAL_DAYS: i64 = 7;

/// Days until a checkup when a reading is flagged urgent
pub const URGENT_INTERVAL_DAYS: i64 = 2;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Strict lower bounds that flag a reading for an earlier checkup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingTriggers {
    /// Readings above this call for a checkup within a week
    pub soon_above: f64,
    /// Readings above this call for a checkup within two days
    pub urgent_above: f64,
}

/// Scheduling cutoffs per type.
///
/// This table is maintained apart from the single-reading risk thresholds and
/// only covers the four types that can move a checkup forward.
pub fn scheduling_triggers(metric_type: MetricType) -> Option<SchedulingTriggers> {
    let (soon_above, urgent_above) = match metric_type {
        MetricType::BloodPressure => (140.0, 180.0),
        MetricType::BloodGlucose => (200.0, 300.0),
        MetricType::HeartRate => (100.0, 120.0),
        MetricType::Cholesterol => (240.0, 300.0),
        MetricType::Bmi | MetricType::OxygenSaturation => return None,
    };
    Some(SchedulingTriggers { soon_above, urgent_above })
}

/// Urgency a single reading asks for, if any
pub fn reading_urgency(metric_type: &str, value: f64) -> Option<UrgencyTier> {
    let triggers = MetricType::from_key(metric_type).and_then(scheduling_triggers)?;
    if value > triggers.urgent_above {
        Some(UrgencyTier::Urgent)
    } else if value > triggers.soon_above {
        Some(UrgencyTier::Soon)
    } else {
        None
    }
}

fn interval_days(urgency: UrgencyTier) -> i64 {
    match urgency {
        UrgencyTier::Normal => ROUTINE_INTERVAL_DAYS,
        UrgencyTier::Soon => SOON_INTERVAL_DAYS,
        UrgencyTier::Urgent => URGENT_INTERVAL_DAYS,
    }
}

/// How flagged readings combine into one urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyAggregation {
    /// The most severe flag among the readings wins
    #[default]
    MaxSeverity,
    /// Readings are visited newest first and the last flagged one sets the
    /// urgency, so an older soon flag can replace a newer urgent one
    LastMatch,
}

impl fmt::Display for UrgencyAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyAggregation::MaxSeverity => write!(f, "max-severity"),
            UrgencyAggregation::LastMatch => write!(f, "last-match"),
        }
    }
}

impl FromStr for UrgencyAggregation {
    type Err = HealthSignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max-severity" => Ok(UrgencyAggregation::MaxSeverity),
            "last-match" => Ok(UrgencyAggregation::LastMatch),
            _ => Err(HealthSignalError::Configuration(format!(
                "Unsupported urgency aggregation: {}",
                s
            ))),
        }
    }
}

/// Whole days from `now` until `date`, rounded up. Negative for past dates.
pub fn days_between(now: DateTime<Utc>, date: DateTime<Utc>) -> i64 {
    let millis = (date - now).num_milliseconds();
    // Integer division truncates toward zero, which already rounds negatives up
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Badge shown for an urgency tier
pub fn urgency_badge(urgency: UrgencyTier) -> UrgencyBadge {
    let (label, style_hint) = match urgency {
        UrgencyTier::Normal => ("Routine", "secondary"),
        UrgencyTier::Soon => ("Soon", "warning"),
        UrgencyTier::Urgent => ("Urgent", "destructive"),
    };
    UrgencyBadge {
        label: label.to_string(),
        style_hint: style_hint.to_string(),
    }
}

/// Advice line for a recommendation
pub fn urgency_guidance(recommendation: &CheckupRecommendation) -> String {
    match recommendation.urgency {
        UrgencyTier::Urgent => {
            "Urgent: Schedule recommended within 48 hours based on your health metrics".to_string()
        }
        UrgencyTier::Soon => {
            "Recommended: Schedule within 7 days for optimal health monitoring".to_string()
        }
        UrgencyTier::Normal => format!(
            "Suggested next checkup by {}",
            recommendation.recommended_date.format("%-m/%-d/%Y")
        ),
    }
}

/// Derives checkup dates from recent readings against an injected clock
#[derive(Debug, Clone)]
pub struct CheckupScheduler<C: Clock> {
    clock: C,
    aggregation: UrgencyAggregation,
}

impl<C: Clock> CheckupScheduler<C> {
    /// Create a new scheduler
    pub fn new(clock: C, aggregation: UrgencyAggregation) -> Self {
        Self { clock, aggregation }
    }

    /// The instant the scheduler computes against
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn aggregation(&self) -> UrgencyAggregation {
        self.aggregation
    }

    /// Recommend the next checkup from the `max_lookback` most recent readings.
    ///
    /// With nothing to look at the checkup is routine, 30 days out. Flagged
    /// readings pull the date in to 7 or 2 days.
    pub fn recommend_next_checkup(
        &self,
        records: &[MetricRecord],
        max_lookback: usize,
    ) -> Result<CheckupRecommendation, HealthSignalError> {
        let now = self.clock.now();
        let recent = most_recent(records, max_lookback);

        let mut days_to_add = ROUTINE_INTERVAL_DAYS;
        let mut urgency = UrgencyTier::Normal;

        for record in &recent {
            ensure_finite(&record.metric_type, record.value)?;

            let Some(flag) = reading_urgency(&record.metric_type, record.value) else {
                continue;
            };

            days_to_add = days_to_add.min(interval_days(flag));
            urgency = match self.aggregation {
                UrgencyAggregation::MaxSeverity => urgency.max(flag),
                UrgencyAggregation::LastMatch => flag,
            };
        }

        debug!(
            "Recommending {} checkup in {} days from {} readings",
            urgency,
            days_to_add,
            recent.len()
        );

        Ok(CheckupRecommendation {
            recommended_date: now + Duration::days(days_to_add),
            urgency,
            days_to_add,
        })
    }

    /// Whole days until `date`, rounded up
    pub fn days_until(&self, date: DateTime<Utc>) -> i64 {
        days_between(self.clock.now(), date)
    }

    /// Confirm a checkup on `date` under the given recommendation
    pub fn schedule_checkup(
        &self,
        date: DateTime<Utc>,
        recommendation: &CheckupRecommendation,
    ) -> Result<CheckupSchedule, HealthSignalError> {
        let now = self.clock.now();
        if date < now {
            return Err(HealthSignalError::Validation(format!(
                "Checkup date {} is in the past",
                date.to_rfc3339()
            )));
        }

        Ok(CheckupSchedule {
            id: Uuid::new_v4().to_string(),
            date,
            urgency: recommendation.urgency,
            recommended_date: Some(recommendation.recommended_date),
            created_at: now,
        })
    }

    /// Assemble the next-checkup card from the full schedule history
    pub fn next_checkup_view(
        &self,
        schedules: &[CheckupSchedule],
        recommendation: &CheckupRecommendation,
    ) -> NextCheckupView {
        let now = self.clock.now();

        let next_checkup = schedules
            .iter()
            .map(|schedule| schedule.date)
            .filter(|date| *date >= now)
            .min();
        let last_checkup = schedules
            .iter()
            .map(|schedule| schedule.date)
            .filter(|date| *date < now)
            .max();

        let days_until_next = next_checkup.map(|date| days_between(now, date));
        let progress_percent = days_until_next.map(|days| {
            (days as f64 * 100.0 / ROUTINE_INTERVAL_DAYS as f64).clamp(0.0, 100.0)
        });

        NextCheckupView {
            next_checkup,
            last_checkup,
            days_until_next,
            progress_percent,
            recommendation: recommendation.clone(),
            badge: urgency_badge(recommendation.urgency),
            guidance: urgency_guidance(recommendation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::{FixedClock, MockClock};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn scheduler(aggregation: UrgencyAggregation) -> CheckupScheduler<FixedClock> {
        CheckupScheduler::new(FixedClock(now()), aggregation)
    }

    /// Create a test reading `hours_ago` hours before now
    fn create_test_record(metric_type: &str, value: f64, hours_ago: i64) -> MetricRecord {
        MetricRecord {
            id: format!("{}-{}", metric_type, hours_ago),
            metric_type: metric_type.to_string(),
            value,
            unit: String::new(),
            timestamp: now() - Duration::hours(hours_ago),
            notes: None,
        }
    }

    fn schedule_on(date: DateTime<Utc>) -> CheckupSchedule {
        CheckupSchedule {
            id: date.to_rfc3339(),
            date,
            urgency: UrgencyTier::Normal,
            recommended_date: None,
            created_at: date - Duration::days(10),
        }
    }

    #[test]
    fn test_empty_input_is_routine() {
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&[], DEFAULT_LOOKBACK)
            .unwrap();

        assert_eq!(recommendation.urgency, UrgencyTier::Normal);
        assert_eq!(recommendation.days_to_add, 30);
        assert_eq!(recommendation.recommended_date, now() + Duration::days(30));
    }

    #[test]
    fn test_urgent_glucose() {
        let records = vec![create_test_record("bloodGlucose", 310.0, 1)];
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();

        assert_eq!(recommendation.days_to_add, 2);
        assert_eq!(recommendation.urgency, UrgencyTier::Urgent);
        assert_eq!(recommendation.recommended_date, now() + Duration::days(2));
    }

    #[test]
    fn test_soon_heart_rate() {
        let records = vec![create_test_record("heartRate", 105.0, 1)];
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();

        assert_eq!(recommendation.days_to_add, 7);
        assert_eq!(recommendation.urgency, UrgencyTier::Soon);
    }

    #[test]
    fn test_triggers_are_strict() {
        let records = vec![
            create_test_record("bloodPressure", 140.0, 1),
            create_test_record("cholesterol", 240.0, 2),
        ];
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();
        assert_eq!(recommendation.urgency, UrgencyTier::Normal);
        assert_eq!(recommendation.days_to_add, 30);
    }

    #[test]
    fn test_untracked_types_never_trigger() {
        let records = vec![
            create_test_record("bmi", 45.0, 1),
            create_test_record("oxygenSaturation", 80.0, 2),
            create_test_record("weight", 150.0, 3),
        ];
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();
        assert_eq!(recommendation.urgency, UrgencyTier::Normal);
    }

    #[test]
    fn test_max_severity_keeps_urgent() {
        // Newest first: the urgent reading is seen before the soon one
        let records = vec![
            create_test_record("bloodPressure", 190.0, 1),
            create_test_record("heartRate", 105.0, 2),
        ];
        let recommendation = scheduler(UrgencyAggregation::MaxSeverity)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();

        assert_eq!(recommendation.urgency, UrgencyTier::Urgent);
        assert_eq!(recommendation.days_to_add, 2);
    }

    #[test]
    fn test_last_match_lets_older_soon_overwrite() {
        let records = vec![
            create_test_record("bloodPressure", 190.0, 1),
            create_test_record("heartRate", 105.0, 2),
        ];
        let recommendation = scheduler(UrgencyAggregation::LastMatch)
            .recommend_next_checkup(&records, DEFAULT_LOOKBACK)
            .unwrap();

        // Date still reflects the urgent reading; the label does not
        assert_eq!(recommendation.urgency, UrgencyTier::Soon);
        assert_eq!(recommendation.days_to_add, 2);
    }

    #[test]
    fn test_lookback_limits_readings() {
        let mut records: Vec<MetricRecord> = (1..=10)
            .map(|hours| create_test_record("heartRate", 70.0, hours))
            .collect();
        records.push(create_test_record("bloodGlucose", 350.0, 48));

        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let recommendation = scheduler.recommend_next_checkup(&records, 10).unwrap();
        assert_eq!(recommendation.urgency, UrgencyTier::Normal);

        let recommendation = scheduler.recommend_next_checkup(&records, 11).unwrap();
        assert_eq!(recommendation.urgency, UrgencyTier::Urgent);
    }

    #[test]
    fn test_non_finite_reading_is_rejected() {
        let records = vec![create_test_record("heartRate", f64::NAN, 1)];
        let result = scheduler(UrgencyAggregation::MaxSeverity).recommend_next_checkup(&records, 10);
        assert!(matches!(result, Err(HealthSignalError::Validation(_))));
    }

    #[test]
    fn test_scheduling_triggers_are_pinned() {
        let expected = [
            (MetricType::BloodPressure, Some((140.0, 180.0))),
            (MetricType::BloodGlucose, Some((200.0, 300.0))),
            (MetricType::HeartRate, Some((100.0, 120.0))),
            (MetricType::Cholesterol, Some((240.0, 300.0))),
            (MetricType::Bmi, None),
            (MetricType::OxygenSaturation, None),
        ];
        for (metric_type, cutoffs) in expected {
            assert_eq!(
                scheduling_triggers(metric_type),
                cutoffs.map(|(soon_above, urgent_above)| SchedulingTriggers { soon_above, urgent_above }),
                "{}",
                metric_type
            );
        }
    }

    #[test]
    fn test_days_between_rounds_up() {
        assert_eq!(days_between(now(), now()), 0);
        assert_eq!(days_between(now(), now() + Duration::days(3)), 3);
        assert_eq!(days_between(now(), now() + Duration::hours(1)), 1);
        assert_eq!(days_between(now(), now() + Duration::hours(49)), 3);
        assert_eq!(days_between(now(), now() - Duration::hours(1)), 0);
        assert_eq!(days_between(now(), now() - Duration::hours(36)), -1);
        assert_eq!(days_between(now(), now() - Duration::days(2)), -2);
    }

    #[test]
    fn test_days_until_uses_clock() {
        let mut clock = MockClock::new();
        clock.expect_now().times(1).returning(now);

        let scheduler = CheckupScheduler::new(clock, UrgencyAggregation::MaxSeverity);
        assert_eq!(scheduler.days_until(now() + Duration::days(5)), 5);
    }

    #[test]
    fn test_urgency_badge() {
        assert_eq!(urgency_badge(UrgencyTier::Normal).label, "Routine");
        assert_eq!(urgency_badge(UrgencyTier::Soon).label, "Soon");
        let urgent = urgency_badge(UrgencyTier::Urgent);
        assert_eq!(urgent.label, "Urgent");
        assert_eq!(urgent.style_hint, "destructive");
    }

    #[test]
    fn test_schedule_checkup() {
        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let recommendation = scheduler
            .recommend_next_checkup(&[create_test_record("heartRate", 105.0, 1)], 10)
            .unwrap();

        let date = now() + Duration::days(6);
        let schedule = scheduler.schedule_checkup(date, &recommendation).unwrap();
        assert_eq!(schedule.date, date);
        assert_eq!(schedule.urgency, UrgencyTier::Soon);
        assert_eq!(schedule.recommended_date, Some(now() + Duration::days(7)));
        assert_eq!(schedule.created_at, now());
        assert!(Uuid::parse_str(&schedule.id).is_ok());
    }

    #[test]
    fn test_schedule_checkup_rejects_past_dates() {
        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let recommendation = scheduler.recommend_next_checkup(&[], 10).unwrap();
        let result = scheduler.schedule_checkup(now() - Duration::days(1), &recommendation);
        assert!(result.unwrap_err().to_string().contains("in the past"));
    }

    #[test]
    fn test_next_checkup_view() {
        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let schedules = vec![
            schedule_on(now() - Duration::days(40)),
            schedule_on(now() + Duration::days(20)),
            schedule_on(now() - Duration::days(3)),
            schedule_on(now() + Duration::days(6)),
        ];
        let recommendation = scheduler.recommend_next_checkup(&[], 10).unwrap();

        let view = scheduler.next_checkup_view(&schedules, &recommendation);
        assert_eq!(view.next_checkup, Some(now() + Duration::days(6)));
        assert_eq!(view.last_checkup, Some(now() - Duration::days(3)));
        assert_eq!(view.days_until_next, Some(6));
        assert_eq!(view.progress_percent, Some(20.0));
        assert_eq!(view.badge.label, "Routine");
        assert_eq!(view.guidance, "Suggested next checkup by 4/4/2024");
    }

    #[test]
    fn test_next_checkup_view_without_schedules() {
        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let records = vec![create_test_record("bloodGlucose", 320.0, 1)];
        let recommendation = scheduler.recommend_next_checkup(&records, 10).unwrap();

        let view = scheduler.next_checkup_view(&[], &recommendation);
        assert!(view.next_checkup.is_none());
        assert!(view.last_checkup.is_none());
        assert!(view.days_until_next.is_none());
        assert!(view.progress_percent.is_none());
        assert_eq!(
            view.guidance,
            "Urgent: Schedule recommended within 48 hours based on your health metrics"
        );
    }

    #[test]
    fn test_progress_is_clamped() {
        let scheduler = scheduler(UrgencyAggregation::MaxSeverity);
        let recommendation = scheduler.recommend_next_checkup(&[], 10).unwrap();
        let view = scheduler.next_checkup_view(&[schedule_on(now() + Duration::days(90))], &recommendation);
        assert_eq!(view.progress_percent, Some(100.0));
    }

    #[test]
    fn test_aggregation_parse() {
        assert_eq!("max-severity".parse::<UrgencyAggregation>().unwrap(), UrgencyAggregation::MaxSeverity);
        assert_eq!("Last-Match".parse::<UrgencyAggregation>().unwrap(), UrgencyAggregation::LastMatch);
        assert!("loudest".parse::<UrgencyAggregation>().is_err());
    }

    #[test]
    fn test_idempotent() {
        let scheduler = scheduler(UrgencyAggregation::LastMatch);
        let records = vec![
            create_test_record("cholesterol", 260.0, 1),
            create_test_record("bloodPressure", 185.0, 2),
        ];
        assert_eq!(
            scheduler.recommend_next_checkup(&records, 10).unwrap(),
            scheduler.recommend_next_checkup(&records, 10).unwrap()
        );
    }
}
