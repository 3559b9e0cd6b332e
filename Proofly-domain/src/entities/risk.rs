use serde::{Deserialize, Serialize};
use std::fmt;

use super::metric::MetricType;

/// Coarse severity of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Fixed confidence shown next to a prediction of this tier
    pub fn confidence(self) -> u8 {
        match self {
            RiskTier::Low => 85,
            RiskTier::Medium => 88,
            RiskTier::High => 92,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Type of the classified reading
    pub metric_type: MetricType,

    /// The classified value
    pub value: f64,

    /// Resulting tier
    pub risk: RiskTier,

    /// Human-readable advice for the tier
    pub message: String,

    /// Fixed per-tier confidence, in percent
    pub confidence: u8,
}

/// A dashboard prediction card derived from one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Id of the reading the prediction was made from
    pub id: String,

    /// Card title, e.g. "BloodPressure Analysis"
    pub title: String,

    /// Advice text
    pub prediction: String,

    /// Fixed per-tier confidence, in percent
    pub confidence: u8,

    /// Resulting tier
    pub risk: RiskTier,
}

/// Overall score across recent readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// Score from 0 to 100, absent when nothing could be classified
    pub score: Option<u8>,

    /// "Low", "Medium", "High" or "No Data"
    pub level: String,

    /// Number of readings that contributed to the score
    pub assessed_count: usize,
}
