use thiserror::Error;

use proofly_data::repository::SnapshotError;

/// Error type for health-signal operations
#[derive(Error, Debug)]
pub enum HealthSignalError {
    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Settings could not be read
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Snapshot could not be loaded
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Reject values that would poison aggregates
pub(crate) fn ensure_finite(metric_type: &str, value: f64) -> Result<(), HealthSignalError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HealthSignalError::Validation(format!(
            "{} reading must be a finite number, got {}",
            metric_type, value
        )))
    }
}
