use proofly_data::models::{DocumentTimestamp, DocumentValue, MetricDocument, ScheduleDocument};

use crate::entities::checkup::{CheckupSchedule, UrgencyTier};
use crate::entities::metric::MetricRecord;
use crate::services::errors::{ensure_finite, HealthSignalError};

// Conversion functions between domain entities and stored documents
// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert a stored metric document into a domain record.
///
/// Fails when the value is not a finite number or the timestamp cannot be read.
pub fn convert_to_domain_record(doc: MetricDocument) -> Result<MetricRecord, HealthSignalError> {
    let value = doc.value.to_f64().ok_or_else(|| {
        HealthSignalError::Validation(format!(
            "Metric {} has a non-numeric value: {:?}",
            doc.id, doc.value
        ))
    })?;
    ensure_finite(&doc.metric_type, value)?;

    let timestamp = doc.timestamp.to_datetime().ok_or_else(|| {
        HealthSignalError::Validation(format!(
            "Metric {} has an unreadable timestamp: {:?}",
            doc.id, doc.timestamp
        ))
    })?;

    Ok(MetricRecord {
        id: doc.id,
        metric_type: doc.metric_type,
        value,
        unit: doc.unit,
        timestamp,
        notes: doc.notes.filter(|notes| !notes.trim().is_empty()),
    })
}

/// Convert a stored schedule document into a domain schedule.
///
/// A missing urgency reads as normal and a missing creation time reads as the
/// checkup date.
pub fn convert_to_domain_schedule(doc: ScheduleDocument) -> Result<CheckupSchedule, HealthSignalError> {
    let date = doc.date.to_datetime().ok_or_else(|| {
        HealthSignalError::Validation(format!(
            "Schedule {} has an unreadable date: {:?}",
            doc.id, doc.date
        ))
    })?;

    let urgency = match doc.urgency.as_deref() {
        Some(label) => label
            .parse::<UrgencyTier>()
            .map_err(HealthSignalError::Validation)?,
        None => UrgencyTier::Normal,
    };

    let created_at = doc
        .created_at
        .as_ref()
        .and_then(DocumentTimestamp::to_datetime)
        .unwrap_or(date);

    Ok(CheckupSchedule {
        id: doc.id,
        date,
        urgency,
        recommended_date: doc.recommended_date.as_ref().and_then(DocumentTimestamp::to_datetime),
        created_at,
    })
}

/// Convert a domain record back into its stored form
pub fn convert_to_data_metric(record: &MetricRecord) -> MetricDocument {
    MetricDocument {
        id: record.id.clone(),
        metric_type: record.metric_type.clone(),
        value: DocumentValue::Number(record.value),
        unit: record.unit.clone(),
        timestamp: DocumentTimestamp::from(record.timestamp),
        notes: record.notes.clone(),
    }
}

/// Convert a domain schedule back into its stored form
pub fn convert_to_data_schedule(schedule: &CheckupSchedule) -> ScheduleDocument {
    ScheduleDocument {
        id: schedule.id.clone(),
        date: DocumentTimestamp::from(schedule.date),
        created_at: Some(DocumentTimestamp::from(schedule.created_at)),
        kind: "checkup".to_string(),
        urgency: Some(schedule.urgency.to_string()),
        recommended_date: schedule.recommended_date.map(DocumentTimestamp::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn metric_document(value: DocumentValue, timestamp: DocumentTimestamp) -> MetricDocument {
        MetricDocument {
            id: "m1".to_string(),
            metric_type: "bloodGlucose".to_string(),
            value,
            unit: "mg/dL (diabetes)".to_string(),
            timestamp,
            notes: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_convert_to_domain_record() {
        let doc = metric_document(
            DocumentValue::Text("145".to_string()),
            DocumentTimestamp::Text("2024-03-01T08:30:00Z".to_string()),
        );

        let record = convert_to_domain_record(doc).unwrap();
        assert_eq!(record.id, "m1");
        assert_eq!(record.value, 145.0);
        assert_eq!(record.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());
        // Blank notes are dropped
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_convert_rejects_non_numeric_value() {
        let doc = metric_document(
            DocumentValue::Text("abc".to_string()),
            DocumentTimestamp::Millis(0.0),
        );
        let err = convert_to_domain_record(doc).unwrap_err();
        assert!(err.to_string().contains("non-numeric"));
    }

    #[test]
    fn test_convert_rejects_non_finite_value() {
        let doc = metric_document(
            DocumentValue::Text("NaN".to_string()),
            DocumentTimestamp::Millis(0.0),
        );
        assert!(matches!(
            convert_to_domain_record(doc),
            Err(HealthSignalError::Validation(_))
        ));
    }

    #[test]
    fn test_convert_rejects_bad_timestamp() {
        let doc = metric_document(
            DocumentValue::Number(100.0),
            DocumentTimestamp::Text("03/01/2024".to_string()),
        );
        let err = convert_to_domain_record(doc).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }

    #[test]
    fn test_convert_to_domain_schedule() {
        let doc = ScheduleDocument {
            id: "s1".to_string(),
            date: DocumentTimestamp::Native { seconds: 1709281800, nanoseconds: 0 },
            created_at: None,
            kind: "checkup".to_string(),
            urgency: Some("urgent".to_string()),
            recommended_date: Some(DocumentTimestamp::Text("2024-03-02T00:00:00Z".to_string())),
        };

        let schedule = convert_to_domain_schedule(doc).unwrap();
        assert_eq!(schedule.urgency, UrgencyTier::Urgent);
        assert_eq!(schedule.created_at, schedule.date);
        assert_eq!(
            schedule.recommended_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_convert_schedule_rejects_unknown_urgency() {
        let doc = ScheduleDocument {
            id: "s1".to_string(),
            date: DocumentTimestamp::Millis(1709281800000.0),
            created_at: None,
            kind: "checkup".to_string(),
            urgency: Some("asap".to_string()),
            recommended_date: None,
        };
        let err = convert_to_domain_schedule(doc).unwrap_err();
        assert!(err.to_string().contains("asap"));
    }

    #[test]
    fn test_schedule_survives_storage_form() {
        let schedule = CheckupSchedule {
            id: "s9".to_string(),
            date: Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap(),
            urgency: UrgencyTier::Soon,
            recommended_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        };

        let doc = convert_to_data_schedule(&schedule);
        assert_eq!(doc.urgency.as_deref(), Some("soon"));
        assert_eq!(convert_to_domain_schedule(doc).unwrap(), schedule);
    }
}
