//! Metric catalog for the entry form and reading validation

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::metric::MetricRecord;
use crate::services::errors::HealthSignalError;

/// Chronic conditions the catalog is organized by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Diabetes,
    Hypertension,
    Copd,
    Ckd,
    Chf,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::Hypertension => "hypertension",
            Condition::Copd => "copd",
            Condition::Ckd => "ckd",
            Condition::Chf => "chf",
        }
    }
}

/// Accepted input range for a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// A metric offered by the entry form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDefinition {
    /// Stored type key
    pub key: &'static str,
    /// Lowercase display label
    pub label: &'static str,
    /// Display unit
    pub unit: &'static str,
    /// Accepted input range
    pub range: ValueRange,
}

/// The metrics tracked for one condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionMetrics {
    pub condition: Condition,
    pub metrics: Vec<MetricDefinition>,
}

fn definition(key: &'static str, label: &'static str, unit: &'static str, min: f64, max: f64) -> MetricDefinition {
    MetricDefinition {
        key,
        label,
        unit,
        range: ValueRange { min, max },
    }
}

static CATALOG: Lazy<Vec<ConditionMetrics>> = Lazy::new(|| {
    vec![
        ConditionMetrics {
            condition: Condition::Diabetes,
            metrics: vec![
                definition("bloodGlucose", "blood glucose", "mg/dL", 50.0, 400.0),
                definition("hba1c", "HbA1c", "%", 4.0, 15.0),
                definition("bloodPressure", "blood pressure", "mmHg", 90.0, 180.0),
            ],
        },
        ConditionMetrics {
            condition: Condition::Hypertension,
            metrics: vec![
                definition("systolic", "systolic pressure", "mmHg", 90.0, 180.0),
                definition("diastolic", "diastolic pressure", "mmHg", 60.0, 120.0),
                definition("heartRate", "heart rate", "bpm", 40.0, 200.0),
            ],
        },
        ConditionMetrics {
            condition: Condition::Copd,
            metrics: vec![
                definition("oxygenSaturation", "oxygen saturation", "%", 80.0, 100.0),
                definition("peakFlow", "peak flow", "L/min", 50.0, 800.0),
                definition("respiratoryRate", "respiratory rate", "breaths/min", 10.0, 40.0),
            ],
        },
        ConditionMetrics {
            condition: Condition::Ckd,
            metrics: vec![
                definition("creatinine", "creatinine", "mg/dL", 0.5, 2.0),
                definition("gfr", "GFR", "mL/min", 30.0, 120.0),
                definition("bloodPressure", "blood pressure", "mmHg", 90.0, 180.0),
            ],
        },
        ConditionMetrics {
            condition: Condition::Chf,
            metrics: vec![
                definition("weight", "weight", "kg", 30.0, 300.0),
                definition("bloodPressure", "blood pressure", "mmHg", 90.0, 180.0),
                definition("heartRate", "heart rate", "bpm", 40.0, 200.0),
            ],
        },
    ]
});

/// The full catalog, in condition order
pub fn catalog() -> &'static [ConditionMetrics] {
    &CATALOG
}

/// First definition for a key, in condition order
pub fn find_definition(key: &str) -> Option<&'static MetricDefinition> {
    CATALOG
        .iter()
        .flat_map(|entry| entry.metrics.iter())
        .find(|metric| metric.key == key)
}

/// Every condition that tracks the key
pub fn conditions_for(key: &str) -> Vec<Condition> {
    CATALOG
        .iter()
        .filter(|entry| entry.metrics.iter().any(|metric| metric.key == key))
        .map(|entry| entry.condition)
        .collect()
}

fn joined_conditions(key: &str) -> String {
    conditions_for(key)
        .iter()
        .map(|condition| condition.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label with its conditions, e.g. "blood pressure (diabetes, ckd, chf)".
/// Unknown keys are returned as is.
pub fn display_label(key: &str) -> String {
    match find_definition(key) {
        Some(metric) => format!("{} ({})", metric.label, joined_conditions(key)),
        None => key.to_string(),
    }
}

/// Unit with its conditions, e.g. "mg/dL (diabetes)"
pub fn unit_label(key: &str) -> Option<String> {
    find_definition(key).map(|metric| format!("{} ({})", metric.unit, joined_conditions(key)))
}

pub fn range_for(key: &str) -> Option<ValueRange> {
    find_definition(key).map(|metric| metric.range)
}

/// Parse an entered value and check it against the catalog range.
/// Keys outside the catalog accept any finite number.
pub fn validate_value(key: &str, raw: &str) -> Result<f64, HealthSignalError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| HealthSignalError::Validation("Please enter a valid numeric value.".to_string()))?;

    if let Some(range) = range_for(key) {
        if value < range.min || value > range.max {
            return Err(HealthSignalError::Validation(format!(
                "The value must be between {} and {} for {}.",
                range.min, range.max, key
            )));
        }
    }

    Ok(value)
}

/// A reading as submitted through the entry form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewMetricRequest {
    /// Stored type key
    #[validate(length(min = 1, message = "Metric type is required"))]
    pub metric_type: String,

    /// Entered value, as typed
    #[validate(length(min = 1, message = "Value is required"))]
    pub value: String,

    /// Unit for keys outside the catalog
    pub unit: Option<String>,

    /// Optional notes about the reading
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

fn validation_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    fields
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, messages.join(", "))
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Validate a submitted reading and turn it into a record taken at `now`
pub fn build_record(request: &NewMetricRequest, now: DateTime<Utc>) -> Result<MetricRecord, HealthSignalError> {
    request
        .validate()
        .map_err(|errors| HealthSignalError::Validation(validation_message(&errors)))?;

    let value = validate_value(&request.metric_type, &request.value)?;
    let unit = unit_label(&request.metric_type)
        .or_else(|| request.unit.clone())
        .unwrap_or_default();

    Ok(MetricRecord {
        id: Uuid::new_v4().to_string(),
        metric_type: request.metric_type.clone(),
        value,
        unit,
        timestamp: now,
        notes: request.notes.clone().filter(|notes| !notes.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(metric_type: &str, value: &str) -> NewMetricRequest {
        NewMetricRequest {
            metric_type: metric_type.to_string(),
            value: value.to_string(),
            unit: None,
            notes: None,
        }
    }

    #[test]
    fn test_catalog_shape() {
        assert_eq!(catalog().len(), 5);
        assert!(catalog().iter().all(|entry| entry.metrics.len() == 3));
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("bloodPressure"), "blood pressure (diabetes, ckd, chf)");
        assert_eq!(display_label("gfr"), "GFR (ckd)");
        assert_eq!(display_label("mood"), "mood");
    }

    #[test]
    fn test_unit_label() {
        assert_eq!(unit_label("bloodGlucose").as_deref(), Some("mg/dL (diabetes)"));
        assert_eq!(unit_label("heartRate").as_deref(), Some("bpm (hypertension, chf)"));
        assert_eq!(unit_label("mood"), None);
    }

    #[test]
    fn test_validate_value_in_range() {
        assert_eq!(validate_value("creatinine", "1.2").unwrap(), 1.2);
        assert_eq!(validate_value("oxygenSaturation", " 97 ").unwrap(), 97.0);
    }

    #[test]
    fn test_validate_value_out_of_range() {
        let err = validate_value("creatinine", "2.5").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: The value must be between 0.5 and 2 for creatinine."
        );

        let err = validate_value("bloodGlucose", "20").unwrap_err();
        assert!(err.to_string().contains("between 50 and 400"));
    }

    #[test]
    fn test_validate_value_not_numeric() {
        for raw in ["", "abc", "NaN", "inf"] {
            let err = validate_value("heartRate", raw).unwrap_err();
            assert!(err.to_string().contains("valid numeric value"), "{}", raw);
        }
    }

    #[test]
    fn test_validate_value_unknown_key() {
        assert_eq!(validate_value("mood", "-3").unwrap(), -3.0);
    }

    #[test]
    fn test_build_record() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let mut req = request("bloodGlucose", "145");
        req.notes = Some("after lunch".to_string());

        let record = build_record(&req, now).unwrap();
        assert_eq!(record.value, 145.0);
        assert_eq!(record.unit, "mg/dL (diabetes)");
        assert_eq!(record.timestamp, now);
        assert_eq!(record.notes.as_deref(), Some("after lunch"));
        assert!(Uuid::parse_str(&record.id).is_ok());
    }

    #[test]
    fn test_build_record_unknown_type_keeps_unit() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let mut req = request("steps", "8000");
        req.unit = Some("steps".to_string());

        let record = build_record(&req, now).unwrap();
        assert_eq!(record.unit, "steps");
    }

    #[test]
    fn test_build_record_validation() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

        let err = build_record(&request("", "10"), now).unwrap_err();
        assert!(err.to_string().contains("Metric type is required"));

        let mut req = request("heartRate", "70");
        req.notes = Some("x".repeat(1001));
        let err = build_record(&req, now).unwrap_err();
        assert!(err.to_string().contains("notes: Notes cannot exceed 1000 characters"));

        let err = build_record(&request("heartRate", "250"), now).unwrap_err();
        assert!(err.to_string().contains("between 40 and 200"));
    }
}
