use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::errors::SnapshotError;
use crate::models::{MetricDocument, ScheduleDocument, Snapshot};

/// Read-only access to one delivered snapshot.
///
/// Ordering and windowing happen in the domain services; the repository only
/// hands out the collections as delivered.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRepository {
    snapshot: Snapshot,
}

impl SnapshotRepository {
    /// Wrap an already decoded snapshot
    pub fn new(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        ensure_unique("metrics", snapshot.metrics.iter().map(|m| m.id.as_str()))?;
        ensure_unique("schedules", snapshot.schedules.iter().map(|s| s.id.as_str()))?;

        debug!(
            "Loaded snapshot with {} metrics and {} schedules",
            snapshot.metrics.len(),
            snapshot.schedules.len()
        );

        Ok(Self { snapshot })
    }

    /// Decode a snapshot from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::new(snapshot)
    }

    /// Decode a snapshot from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        Self::new(snapshot)
    }

    /// Decode a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Every metric document, in delivery order
    pub fn all_metrics(&self) -> &[MetricDocument] {
        &self.snapshot.metrics
    }

    /// Every schedule document, in delivery order
    pub fn all_schedules(&self) -> &[ScheduleDocument] {
        &self.snapshot.schedules
    }
}

fn ensure_unique<'a>(
    collection: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SnapshotError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SnapshotError::DuplicateId {
                collection,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
