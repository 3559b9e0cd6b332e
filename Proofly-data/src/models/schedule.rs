use serde::{Deserialize, Serialize};

use super::timestamp::DocumentTimestamp;

fn default_kind() -> String {
    "checkup".to_string()
}

/// Storage model for a scheduled checkup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    /// Document identifier assigned by the store
    pub id: String,

    /// Target date of the checkup
    pub date: DocumentTimestamp,

    /// When the schedule was confirmed
    #[serde(default)]
    pub created_at: Option<DocumentTimestamp>,

    /// Schedule kind; only checkups are written today
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Urgency label recorded at scheduling time (`normal`, `soon`, `urgent`)
    #[serde(default)]
    pub urgency: Option<String>,

    /// The suggestion shown when the schedule was confirmed
    #[serde(default)]
    pub recommended_date: Option<DocumentTimestamp>,
}
