use thiserror::Error;

/// Error type for snapshot loading
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Malformed snapshot JSON
    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Snapshot could not be read
    #[error("Snapshot read error: {0}")]
    Io(#[from] std::io::Error),

    /// Two documents in one collection share an id
    #[error("Duplicate document id in {collection}: {id}")]
    DuplicateId {
        /// Collection holding the duplicates
        collection: &'static str,
        /// The repeated id
        id: String,
    },
}
