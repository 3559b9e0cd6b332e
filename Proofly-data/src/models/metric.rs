use serde::{Deserialize, Serialize};

use super::timestamp::DocumentTimestamp;

/// Numeric field as stored by the metric entry form.
///
/// The form submits its inputs as strings, so older documents hold
/// `"120"` while imported ones hold a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentValue {
    /// JSON number
    Number(f64),

    /// Numeric text
    Text(String),
}

impl DocumentValue {
    /// Parse the stored value. Text must be a complete number, surrounding
    /// whitespace aside.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            DocumentValue::Number(value) => Some(*value),
            DocumentValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

/// Storage model for one health metric reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDocument {
    /// Document identifier assigned by the store
    pub id: String,

    /// Kind of measurement, e.g. `bloodPressure`
    pub metric_type: String,

    /// The reading
    pub value: DocumentValue,

    /// Display unit, possibly decorated with the related conditions
    #[serde(default)]
    pub unit: String,

    /// When the reading was taken
    pub timestamp: DocumentTimestamp,

    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_form_document() {
        let json = r#"{
            "id": "m1",
            "metricType": "bloodGlucose",
            "value": "145",
            "unit": "mg/dL (diabetes)",
            "notes": "",
            "timestamp": "2024-03-01T08:30:00.000Z"
        }"#;

        let doc: MetricDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.metric_type, "bloodGlucose");
        assert_eq!(doc.value, DocumentValue::Text("145".to_string()));
        assert_eq!(doc.value.to_f64(), Some(145.0));
        assert_eq!(doc.notes.as_deref(), Some(""));
    }

    #[test]
    fn test_deserialize_numeric_document() {
        let json = r#"{
            "id": "m2",
            "metricType": "heartRate",
            "value": 72.5,
            "timestamp": 1709281800000
        }"#;

        let doc: MetricDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.value.to_f64(), Some(72.5));
        assert_eq!(doc.unit, "");
        assert!(doc.notes.is_none());
    }

    #[test]
    fn test_non_numeric_text_value() {
        assert_eq!(DocumentValue::Text("high".to_string()).to_f64(), None);
        assert_eq!(DocumentValue::Text(" 98 ".to_string()).to_f64(), Some(98.0));
    }
}
