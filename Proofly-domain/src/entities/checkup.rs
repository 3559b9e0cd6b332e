use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How soon a checkup should happen. Ordered by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    #[default]
    Normal,
    Soon,
    Urgent,
}

impl UrgencyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyTier::Normal => "normal",
            UrgencyTier::Soon => "soon",
            UrgencyTier::Urgent => "urgent",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(UrgencyTier::Normal),
            "soon" => Ok(UrgencyTier::Soon),
            "urgent" => Ok(UrgencyTier::Urgent),
            _ => Err(format!("Invalid urgency: {}", s)),
        }
    }
}

/// A confirmed checkup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckupSchedule {
    /// Unique identifier for the schedule
    pub id: String,

    /// Target date of the checkup
    pub date: DateTime<Utc>,

    /// Urgency derived when the schedule was confirmed
    pub urgency: UrgencyTier,

    /// The suggestion in effect when the schedule was confirmed
    pub recommended_date: Option<DateTime<Utc>>,

    /// When the schedule was confirmed
    pub created_at: DateTime<Utc>,
}

/// Suggested next checkup derived from recent readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckupRecommendation {
    /// Suggested checkup date
    pub recommended_date: DateTime<Utc>,

    /// Urgency of the suggestion
    pub urgency: UrgencyTier,

    /// Days between the computation instant and the suggested date
    pub days_to_add: i64,
}

/// Display label for an urgency tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyBadge {
    /// "Routine", "Soon" or "Urgent"
    pub label: String,

    /// Presentation variant hint
    pub style_hint: String,
}

/// Everything the next-checkup card shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextCheckupView {
    /// Earliest schedule dated now or later
    pub next_checkup: Option<DateTime<Utc>>,

    /// Latest schedule dated before now
    pub last_checkup: Option<DateTime<Utc>>,

    /// Whole days until `next_checkup`, rounded up
    pub days_until_next: Option<i64>,

    /// Share of a 30-day cycle remaining, clamped to 0..=100
    pub progress_percent: Option<f64>,

    /// The current recommendation
    pub recommendation: CheckupRecommendation,

    /// Badge for the recommendation's urgency
    pub badge: UrgencyBadge,

    /// Advice line for the recommendation's urgency
    pub guidance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_order() {
        assert!(UrgencyTier::Normal < UrgencyTier::Soon);
        assert!(UrgencyTier::Soon < UrgencyTier::Urgent);
        assert_eq!(UrgencyTier::default(), UrgencyTier::Normal);
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!("urgent".parse::<UrgencyTier>(), Ok(UrgencyTier::Urgent));
        assert!("Urgent".parse::<UrgencyTier>().is_err());
        assert_eq!(UrgencyTier::Soon.to_string(), "soon");
    }
}
