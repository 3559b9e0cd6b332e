use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain model for one health metric reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Unique identifier for the reading
    pub id: String,

    /// Kind of measurement. Free-form: types outside [`MetricType`] are
    /// kept for display and aggregation.
    pub metric_type: String,

    /// The reading; always finite once converted
    pub value: f64,

    /// Display unit
    pub unit: String,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,

    /// Optional notes about the reading
    pub notes: Option<String>,
}

/// Metric types with risk thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    BloodPressure,
    BloodGlucose,
    HeartRate,
    Cholesterol,
    Bmi,
    OxygenSaturation,
}

/// Which way a reading has to move to become worse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskDirection {
    /// Larger readings are worse
    HigherIsWorse,
    /// Smaller readings are worse
    LowerIsWorse,
}

impl MetricType {
    /// Every recognized type
    pub const ALL: [MetricType; 6] = [
        MetricType::BloodPressure,
        MetricType::BloodGlucose,
        MetricType::HeartRate,
        MetricType::Cholesterol,
        MetricType::Bmi,
        MetricType::OxygenSaturation,
    ];

    /// Look up a type by its stored key. Keys are case sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "bloodPressure" => Some(MetricType::BloodPressure),
            "bloodGlucose" => Some(MetricType::BloodGlucose),
            "heartRate" => Some(MetricType::HeartRate),
            "cholesterol" => Some(MetricType::Cholesterol),
            "bmi" => Some(MetricType::Bmi),
            "oxygenSaturation" => Some(MetricType::OxygenSaturation),
            _ => None,
        }
    }

    /// Stored key
    pub fn key(self) -> &'static str {
        match self {
            MetricType::BloodPressure => "bloodPressure",
            MetricType::BloodGlucose => "bloodGlucose",
            MetricType::HeartRate => "heartRate",
            MetricType::Cholesterol => "cholesterol",
            MetricType::Bmi => "bmi",
            MetricType::OxygenSaturation => "oxygenSaturation",
        }
    }

    pub fn direction(self) -> RiskDirection {
        match self {
            MetricType::OxygenSaturation => RiskDirection::LowerIsWorse,
            _ => RiskDirection::HigherIsWorse,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-type statistics over a window of readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    /// Literal type key the readings were grouped under
    pub metric_type: String,

    /// Lowest value in the window
    pub min: f64,

    /// Highest value in the window
    pub max: f64,

    /// Mean value, rounded to one decimal
    pub average: f64,

    /// Most recent value
    pub last_value: f64,

    /// Percent change between the two most recent values, rounded to one decimal
    pub trend_percent: f64,

    /// Number of readings in the window
    pub record_count: usize,
}

impl MetricStatistics {
    pub fn trend_direction(&self) -> TrendDirection {
        if self.trend_percent >= 0.0 {
            TrendDirection::Increase
        } else {
            TrendDirection::Decrease
        }
    }
}

/// Direction of the latest change, as worded on the analytics chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Zero or positive trend
    Increase,
    /// Negative trend
    Decrease,
}

impl TrendDirection {
    /// Phrase used in chart captions
    pub fn phrase(self) -> &'static str {
        match self {
            TrendDirection::Increase => "an increase",
            TrendDirection::Decrease => "a decrease",
        }
    }
}
