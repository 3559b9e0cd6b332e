use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp field as it appears in stored documents.
///
/// Metric documents carry an ISO-8601 string, schedule documents carry the
/// store's native `{seconds, nanoseconds}` object, and some exports flatten
/// either one into epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentTimestamp {
    /// Native store timestamp
    Native {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },

    /// Milliseconds since the Unix epoch. Some exports write these as floats.
    Millis(f64),

    /// RFC 3339 string
    Text(String),
}

impl DocumentTimestamp {
    /// Resolve to a UTC instant, if the stored value is well formed
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            DocumentTimestamp::Native { seconds, nanoseconds } => {
                DateTime::from_timestamp(*seconds, *nanoseconds)
            }
            DocumentTimestamp::Millis(millis) => {
                if !millis.is_finite() {
                    return None;
                }
                // Out-of-range floats saturate and are rejected by chrono
                DateTime::from_timestamp_millis(millis.trunc() as i64)
            }
            DocumentTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl From<DateTime<Utc>> for DocumentTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        DocumentTimestamp::Text(dt.to_rfc3339())
    }
}
