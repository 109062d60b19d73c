//! Statement execution seam.
//!
//! The core only emits text and parameters; anything that touches a live
//! database goes through a [`Link`]. Driver crates implement this trait so
//! the builder and migrator stay driver-agnostic.

use crate::dialect::Dialect;
use crate::value::SqlValue;

/// A live connection capable of executing generated statements.
///
/// Implementations are synchronous; callers that need cancellation or
/// timeouts wrap the execution calls themselves.
pub trait Link {
    /// Returns the dialect this connection speaks.
    fn driver_name(&self) -> Dialect;

    /// Executes a statement, returning the number of affected rows.
    ///
    /// Placeholders in `sql` are `?`; implementations renumber if their
    /// wire protocol uses a different positional style.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, LinkError>;

    /// Runs a query, returning all result rows.
    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, LinkError>;
}

/// One result row with named columns.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Creates a row from parallel column-name and value lists.
    ///
    /// # Panics
    ///
    /// Panics if the lists have different lengths; a driver producing
    /// mismatched rows is a programming error, not runtime input.
    #[must_use]
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        assert_eq!(
            columns.len(),
            values.len(),
            "row column/value count mismatch"
        );
        Self { columns, values }
    }

    /// Returns the value for a column, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }

    /// Returns a text column's contents.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(SqlValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns an integer column's contents.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(SqlValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the values in column order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Errors surfaced by a [`Link`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The underlying driver reported a failure.
    #[error("driver error: {0}")]
    Driver(String),

    /// The statement is not supported by this driver.
    #[error("unsupported statement: {0}")]
    Unsupported(String),
}
