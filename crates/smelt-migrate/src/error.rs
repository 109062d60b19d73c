//! Migration error types.

use smelt_sql_core::link::LinkError;
use thiserror::Error;

/// Errors that can occur while migrating a table.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The record declares no fields, so there is nothing to create.
    #[error("record for table '{table}' declares no fields")]
    EmptyRecord {
        /// Table the record maps to.
        table: String,
    },

    /// Reading the live catalog failed.
    #[error("failed to introspect table '{table}'")]
    Introspection {
        /// Table being inspected.
        table: String,
        /// Driver failure.
        #[source]
        source: LinkError,
    },

    /// A planned DDL statement failed to execute.
    #[error("DDL failed on table '{table}': {sql}")]
    Ddl {
        /// Table being migrated.
        table: String,
        /// The statement that failed.
        sql: String,
        /// Driver failure.
        #[source]
        source: LinkError,
    },
}

/// Result alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
