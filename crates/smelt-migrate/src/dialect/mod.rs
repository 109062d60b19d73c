//! Database dialect implementations for DDL generation.
//!
//! Each dialect knows how to render column definitions and schema-change
//! statements for one database system, and how to read that system's
//! catalog back into a comparable shape.

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use mssql::MssqlDdl;
pub use mysql::MySqlDdl;
pub use postgres::PostgresDdl;
pub use sqlite::SqliteDdl;

use smelt_sql_core::dialect::Dialect;
use smelt_sql_core::link::Row;
use smelt_sql_core::schema::{FieldMeta, SqlType};
use smelt_sql_core::value::SqlValue;

/// Returns the DDL generator for a dialect.
#[must_use]
pub fn ddl_for(dialect: Dialect) -> &'static dyn DdlDialect {
    match dialect {
        Dialect::MySql => &MySqlDdl,
        Dialect::Postgres => &PostgresDdl,
        Dialect::Sqlite => &SqliteDdl,
        Dialect::Mssql => &MssqlDdl,
    }
}

/// One column as reported by the live catalog, normalized for comparison.
#[derive(Debug, Clone)]
pub struct LiveColumn {
    /// Column name.
    pub name: String,
    /// Lowercased, dialect-normalized type name (e.g. `varchar(255)`).
    pub type_name: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether the column is part of the primary key.
    pub primary_key: bool,
}

/// Trait for database-specific DDL generation and catalog reading.
pub trait DdlDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Quotes an identifier (table or column name).
    fn quote(&self, ident: &str) -> String {
        format!("\"{ident}\"")
    }

    /// Returns the SQL type name for a declared type.
    fn type_name(&self, sql_type: &SqlType) -> String;

    /// Returns the auto-increment keyword, when the dialect uses one.
    fn auto_increment_keyword(&self) -> &'static str;

    /// Renders one column definition.
    fn column_definition(&self, column: &FieldMeta) -> String {
        let mut parts = vec![
            self.quote(&column.column),
            self.type_name(&column.sql_type),
        ];

        if column.primary_key {
            parts.push(String::from("PRIMARY KEY"));
            if column.auto_increment {
                parts.push(String::from(self.auto_increment_keyword()));
            }
        }

        if !column.nullable && !column.primary_key {
            parts.push(String::from("NOT NULL"));
        }

        if let Some(ref default_expr) = column.default_expr {
            parts.push(format!("DEFAULT {default_expr}"));
        }

        parts.join(" ")
    }

    /// Renders a CREATE TABLE statement for all desired columns.
    fn create_table_sql(&self, table: &str, columns: &[FieldMeta]) -> String {
        let defs: Vec<String> = columns.iter().map(|c| self.column_definition(c)).collect();
        format!(
            "CREATE TABLE {} ({})",
            self.quote(table),
            defs.join(", ")
        )
    }

    /// Renders an ALTER TABLE ADD COLUMN statement.
    fn add_column_sql(&self, table: &str, column: &FieldMeta) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote(table),
            self.column_definition(column)
        )
    }

    /// Renders the statements altering an existing column to match the
    /// desired definition. An empty list means the dialect cannot alter
    /// columns in place; the migrator logs and skips.
    fn modify_column_sql(&self, table: &str, column: &FieldMeta) -> Vec<String>;

    /// Returns the catalog query for a table's current columns.
    fn introspect_sql(&self, table: &str) -> (String, Vec<SqlValue>);

    /// Normalizes catalog rows into comparable live columns.
    fn parse_live_columns(&self, rows: &[Row]) -> Vec<LiveColumn>;
}

/// Shared INFORMATION_SCHEMA row parsing for the dialects that expose it.
///
/// `compose_type` builds the normalized type string from the row's
/// `DATA_TYPE` and length/precision columns.
pub(crate) fn parse_information_schema_rows(
    rows: &[Row],
    compose_type: impl Fn(&Row, &str) -> String,
) -> Vec<LiveColumn> {
    rows.iter()
        .filter_map(|row| {
            let name = row.text("column_name")?.to_string();
            let data_type = row.text("data_type")?.to_ascii_lowercase();
            let nullable = row
                .text("is_nullable")
                .is_some_and(|v| v.eq_ignore_ascii_case("yes"));
            Some(LiveColumn {
                name,
                type_name: compose_type(row, &data_type),
                nullable,
                primary_key: false,
            })
        })
        .collect()
}
