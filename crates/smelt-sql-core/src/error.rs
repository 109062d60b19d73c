//! Error types for statement building.

use crate::link::LinkError;

/// Errors surfaced while finalizing a statement.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No table name was configured and none could be resolved.
    #[error("no table name configured and none resolvable from the record")]
    MissingTable,

    /// A SET/INSERT finalize found no explicitly set fields.
    #[error("record for table '{0}' has no set fields to write")]
    NoSetFields(String),

    /// Execution through the link failed.
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, Error>;
