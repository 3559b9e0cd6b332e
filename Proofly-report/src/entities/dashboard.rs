use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics for one metric type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicMetricStatistics {
    /// Stored type key
    pub metric_type: String,

    /// Label with related conditions, or the key for types outside the catalog
    pub label: String,

    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub last_value: f64,

    /// Percent change between the last two readings
    pub trend_percent: f64,

    /// Chart caption, e.g. "Metric value shows an increase by 4.2% today"
    pub trend_caption: String,

    pub record_count: usize,
}

/// A prediction card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicPrediction {
    /// Id of the reading the card was derived from
    pub id: String,
    pub title: String,
    pub prediction: String,
    pub confidence: u8,
    /// `low`, `medium` or `high`
    pub risk: String,
}

/// Overall health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicHealthScore {
    /// Absent when no reading could be classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,

    /// `Low`, `Medium`, `High` or `No Data`
    pub level: String,

    pub assessed_count: usize,
}

/// Next-checkup card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicNextCheckup {
    /// Earliest confirmed checkup from now on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_checkup: Option<DateTime<Utc>>,

    /// Latest confirmed checkup before now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkup: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_next: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percent: Option<f64>,

    /// Date suggested from recent readings
    pub recommended_date: DateTime<Utc>,

    /// `normal`, `soon` or `urgent`
    pub urgency: String,

    pub days_to_add: i64,
    pub badge_label: String,
    pub badge_style: String,
    pub guidance: String,
}

/// Everything the dashboard shows for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Instant the report was computed against
    pub generated_at: DateTime<Utc>,

    /// Per-type statistics, in first-appearance order
    pub statistics: Vec<PublicMetricStatistics>,

    /// Prediction cards, newest reading first
    pub predictions: Vec<PublicPrediction>,

    pub health_score: PublicHealthScore,

    pub next_checkup: PublicNextCheckup,

    /// Documents left out because they could not be read
    pub skipped_documents: usize,
}
