// Repository module structure
pub mod errors;
mod snapshot;

// Re-export commonly used types
pub use errors::SnapshotError;
pub use snapshot::SnapshotRepository;
