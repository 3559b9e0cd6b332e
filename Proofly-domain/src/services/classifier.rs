//! Single-reading risk classification, prediction cards and the health score

use tracing::debug;

use crate::entities::metric::{MetricRecord, MetricType, RiskDirection};
use crate::entities::risk::{HealthScore, Prediction, RiskAssessment, RiskTier};
use crate::services::errors::{ensure_finite, HealthSignalError};
use crate::services::most_recent;

/// Risk cutoffs for one metric type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub low: f64,
    pub medium: f64,
    /// Listed with the other cutoffs but not consulted when assigning a tier
    pub high: f64,
}

/// Cutoffs used to classify a single reading.
///
/// Kept apart from the checkup scheduling triggers; the two tables are
/// maintained independently.
pub fn risk_thresholds(metric_type: MetricType) -> RiskThresholds {
    let (low, medium, high) = match metric_type {
        MetricType::BloodPressure => (120.0, 140.0, 180.0),
        MetricType::BloodGlucose => (140.0, 200.0, 300.0),
        MetricType::HeartRate => (60.0, 100.0, 120.0),
        MetricType::Cholesterol => (200.0, 240.0, 300.0),
        MetricType::Bmi => (25.0, 30.0, 35.0),
        MetricType::OxygenSaturation => (95.0, 90.0, 85.0),
    };
    RiskThresholds { low, medium, high }
}

/// Assign a tier to a reading of a recognized type
pub fn risk_tier(metric_type: MetricType, value: f64) -> RiskTier {
    let thresholds = risk_thresholds(metric_type);
    match metric_type.direction() {
        RiskDirection::HigherIsWorse => {
            if value <= thresholds.low {
                RiskTier::Low
            } else if value <= thresholds.medium {
                RiskTier::Medium
            } else {
                RiskTier::High
            }
        }
        RiskDirection::LowerIsWorse => {
            if value >= thresholds.low {
                RiskTier::Low
            } else if value >= thresholds.medium {
                RiskTier::Medium
            } else {
                RiskTier::High
            }
        }
    }
}

/// Advice text for a type and tier
pub fn risk_message(metric_type: MetricType, risk: RiskTier) -> &'static str {
    use MetricType::*;
    use RiskTier::*;

    match (metric_type, risk) {
        (BloodPressure, Low) => "Your blood pressure is within a healthy range. Continue maintaining your current lifestyle.",
        (BloodPressure, Medium) => "Your blood pressure is slightly elevated. Consider reducing sodium intake and increasing physical activity.",
        (BloodPressure, High) => "Your blood pressure requires immediate medical attention. Please consult your healthcare provider.",
        (BloodGlucose, Low) => "Your blood glucose levels are normal. Maintain a balanced diet and regular exercise routine.",
        (BloodGlucose, Medium) => "Your blood glucose is moderately elevated. Monitor your carbohydrate intake and consider increasing physical activity.",
        (BloodGlucose, High) => "Your blood glucose levels require immediate attention. Please seek medical advice and review your diabetes management plan.",
        (HeartRate, Low) => "Your resting heart rate is within a healthy range. Continue your current fitness routine.",
        (HeartRate, Medium) => "Your heart rate is slightly elevated. Consider stress-reduction techniques and moderate exercise.",
        (HeartRate, High) => "Your heart rate is significantly elevated. Please consult a healthcare provider for evaluation.",
        (Cholesterol, Low) => "Your cholesterol levels are within a healthy range. Maintain your heart-healthy diet.",
        (Cholesterol, Medium) => "Your cholesterol is borderline high. Consider dietary changes and increasing physical activity.",
        (Cholesterol, High) => "Your cholesterol levels require attention. Consult your healthcare provider about management strategies.",
        (Bmi, Low) => "Your BMI is within a healthy range. Maintain your balanced diet and exercise routine.",
        (Bmi, Medium) => "Your BMI indicates overweight status. Consider working with a nutritionist for dietary guidance.",
        (Bmi, High) => "Your BMI indicates obesity. Please consult healthcare providers for a comprehensive weight management plan.",
        (OxygenSaturation, Low) => "Your oxygen saturation is normal. Continue monitoring as usual.",
        (OxygenSaturation, Medium) => "Your oxygen saturation is slightly low. Consider deep breathing exercises and monitoring more frequently.",
        (OxygenSaturation, High) => "Your oxygen saturation is concerning. Seek immediate medical attention.",
    }
}

/// Classify one reading.
///
/// Returns `Ok(None)` for types without thresholds and a validation error for
/// non-finite values.
pub fn classify(metric_type: &str, value: f64) -> Result<Option<RiskAssessment>, HealthSignalError> {
    ensure_finite(metric_type, value)?;

    let Some(recognized) = MetricType::from_key(metric_type) else {
        debug!("No risk thresholds for metric type {}, skipping", metric_type);
        return Ok(None);
    };

    let risk = risk_tier(recognized, value);
    Ok(Some(RiskAssessment {
        metric_type: recognized,
        value,
        risk,
        message: risk_message(recognized, risk).to_string(),
        confidence: risk.confidence(),
    }))
}

/// Card title for a type, e.g. "BloodPressure Analysis"
pub fn prediction_title(metric_type: MetricType) -> String {
    let key = metric_type.key();
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("{}{} Analysis", first.to_uppercase(), chars.as_str()),
        None => "Analysis".to_string(),
    }
}

/// Prediction cards for the `limit` most recent readings, newest first.
/// Readings of unrecognized types produce no card.
pub fn predictions(records: &[MetricRecord], limit: usize) -> Result<Vec<Prediction>, HealthSignalError> {
    let mut cards = Vec::new();
    for record in most_recent(records, limit) {
        if let Some(assessment) = classify(&record.metric_type, record.value)? {
            cards.push(Prediction {
                id: record.id.clone(),
                title: prediction_title(assessment.metric_type),
                prediction: assessment.message,
                confidence: assessment.confidence,
                risk: assessment.risk,
            });
        }
    }
    Ok(cards)
}

fn tier_points(risk: RiskTier) -> f64 {
    match risk {
        RiskTier::Low => 100.0,
        RiskTier::Medium => 70.0,
        RiskTier::High => 40.0,
    }
}

/// Overall score over the `lookback` most recent readings.
///
/// Each classified reading contributes 100, 70 or 40 points for a low, medium
/// or high tier and the score is the rounded mean. Scores above 80 read as
/// "Low" risk and above 60 as "Medium".
pub fn health_score(records: &[MetricRecord], lookback: usize) -> Result<HealthScore, HealthSignalError> {
    let mut total = 0.0;
    let mut assessed_count = 0;
    for record in most_recent(records, lookback) {
        if let Some(assessment) = classify(&record.metric_type, record.value)? {
            total += tier_points(assessment.risk);
            assessed_count += 1;
        }
    }

    if assessed_count == 0 {
        return Ok(HealthScore {
            score: None,
            level: "No Data".to_string(),
            assessed_count,
        });
    }

    let score = (total / assessed_count as f64).round().clamp(0.0, 100.0) as u8;
    let level = if score > 80 {
        "Low"
    } else if score > 60 {
        "Medium"
    } else {
        "High"
    };

    Ok(HealthScore {
        score: Some(score),
        level: level.to_string(),
        assessed_count,
    })
}
