//! Additive schema migration for smelt-sql record types.
//!
//! The migrator reads a table's live columns through a
//! [`Link`](smelt_sql_core::link::Link), compares them against a
//! [`Record`](smelt_sql_core::schema::Record)'s declared fields, and
//! executes the `CREATE TABLE` / `ALTER TABLE` statements closing the
//! gap. It only ever adds or widens: existing columns unknown to the
//! record are preserved, and nothing is dropped or renamed.
//!
//! Batch migrations via [`Migrator::auto_migrate`] isolate failures per
//! table, so one broken record does not block the rest of the schema.

pub mod dialect;
pub mod diff;
pub mod error;

pub use dialect::{ddl_for, DdlDialect, LiveColumn};
pub use diff::MigrationPlan;
pub use error::{MigrateError, Result};

use smelt_sql_core::dialect::Dialect;
use smelt_sql_core::link::Link;
use smelt_sql_core::schema::Record;
use tracing::{debug, info, warn};

/// What happened to one table during a successful migration.
#[derive(Debug)]
pub struct TableOutcome {
    /// DDL statements that were executed, in order. Empty when the table
    /// already matched.
    pub statements: Vec<String>,
    /// Columns that drifted but cannot be altered on this dialect.
    pub skipped_columns: Vec<String>,
}

/// Per-table result of a batch migration.
#[derive(Debug)]
pub struct TableReport {
    /// Table name.
    pub table: String,
    /// Outcome or the error that stopped this table.
    pub result: Result<TableOutcome>,
}

/// Drives schema migration over a live connection.
pub struct Migrator<'l, L: Link + ?Sized> {
    link: &'l L,
}

impl<'l, L: Link + ?Sized> Migrator<'l, L> {
    /// Creates a migrator over a connection.
    pub fn new(link: &'l L) -> Self {
        Self { link }
    }

    /// Migrates every record's table, continuing past per-table failures.
    ///
    /// Records are processed in order; each entry in the returned report
    /// corresponds to one input record.
    pub fn auto_migrate(&self, records: &[&dyn Record]) -> Vec<TableReport> {
        records
            .iter()
            .map(|record| {
                let table = record.table_name();
                let result = self.migrate(*record);
                if let Err(ref e) = result {
                    warn!(table = %table, error = %e, "table migration failed");
                }
                TableReport { table, result }
            })
            .collect()
    }

    /// Brings one record's table up to its declared shape.
    pub fn migrate(&self, record: &dyn Record) -> Result<TableOutcome> {
        let table = record.table_name();
        let desired = record.fields();
        if desired.is_empty() {
            return Err(MigrateError::EmptyRecord { table });
        }

        let ddl = ddl_for(self.link.driver_name());
        let (introspect_sql, introspect_params) = ddl.introspect_sql(&table);
        let rows = self
            .link
            .query(&introspect_sql, &introspect_params)
            .map_err(|source| MigrateError::Introspection {
                table: table.clone(),
                source,
            })?;
        let live = ddl.parse_live_columns(&rows);
        debug!(table = %table, live_columns = live.len(), "introspected table");

        let plan = diff::plan(ddl, &table, &desired, &live);
        if plan.is_noop() {
            debug!(table = %table, "schema already up to date");
        }
        for column in &plan.skipped_columns {
            warn!(
                table = %table,
                column = %column,
                dialect = ddl.name(),
                "column drifted but cannot be altered in place; skipping"
            );
        }

        for sql in &plan.statements {
            info!(table = %table, sql = %sql, "applying schema change");
            self.link
                .execute(sql, &[])
                .map_err(|source| MigrateError::Ddl {
                    table: table.clone(),
                    sql: sql.clone(),
                    source,
                })?;
        }

        Ok(TableOutcome {
            statements: plan.statements,
            skipped_columns: plan.skipped_columns,
        })
    }

    /// Returns the server-rendered CREATE TABLE statement.
    ///
    /// Only MySQL exposes this; other dialects return an empty string.
    pub fn show_create_table(&self, table: &str) -> Result<String> {
        match self.link.driver_name() {
            Dialect::MySql => {
                let sql = format!("SHOW CREATE TABLE `{table}`");
                let rows = self.link.query(&sql, &[]).map_err(|source| {
                    MigrateError::Introspection {
                        table: String::from(table),
                        source,
                    }
                })?;
                Ok(rows
                    .first()
                    .and_then(|row| row.text("Create Table"))
                    .map(String::from)
                    .unwrap_or_default())
            }
            Dialect::Postgres | Dialect::Sqlite | Dialect::Mssql => Ok(String::new()),
        }
    }
}
