//! rusqlite adapter for smelt-sql.
//!
//! Wraps a [`rusqlite::Connection`] in the
//! [`Link`](smelt_sql_core::link::Link) trait so generated statements can
//! run against SQLite. SQLite accepts the builder's `?` placeholders
//! directly, so no renumbering happens here.

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;
use smelt_sql_core::dialect::Dialect;
use smelt_sql_core::link::{Link, LinkError, Row};
use smelt_sql_core::value::SqlValue;

/// A SQLite connection usable by the builder and migrator.
pub struct SqliteLink {
    conn: Connection,
}

impl SqliteLink {
    /// Opens a database file, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LinkError> {
        Connection::open(path)
            .map(|conn| Self { conn })
            .map_err(driver_err)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, LinkError> {
        Connection::open_in_memory()
            .map(|conn| Self { conn })
            .map_err(driver_err)
    }

    /// Returns the wrapped connection for driver-specific calls.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl From<Connection> for SqliteLink {
    fn from(conn: Connection) -> Self {
        Self { conn }
    }
}

impl Link for SqliteLink {
    fn driver_name(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, LinkError> {
        let mut stmt = self.conn.prepare(sql).map_err(driver_err)?;
        let changed = stmt
            .execute(rusqlite::params_from_iter(params.iter().map(bind_value)))
            .map_err(driver_err)?;
        Ok(changed as u64)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<Row>, LinkError> {
        let mut stmt = self.conn.prepare(sql).map_err(driver_err)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter().map(bind_value)))
            .map_err(driver_err)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(driver_err)? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: Value = row.get(i).map_err(driver_err)?;
                values.push(read_value(value));
            }
            out.push(Row::new(columns.clone(), values));
        }
        Ok(out)
    }
}

fn driver_err(e: rusqlite::Error) -> LinkError {
    LinkError::Driver(e.to_string())
}

/// Converts a builder value into rusqlite's owned value type.
///
/// Booleans are stored as 0/1 integers, matching SQLite's own convention.
fn bind_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Bool(b) => Value::Integer(i64::from(*b)),
        SqlValue::Int(n) => Value::Integer(*n),
        SqlValue::Float(f) => Value::Real(*f),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

fn read_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Int(n),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    }
}
