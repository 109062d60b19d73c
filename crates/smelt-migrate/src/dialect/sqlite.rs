//! SQLite DDL dialect.
//!
//! SQLite cannot alter a column in place, so type and nullability drift
//! is reported and skipped rather than repaired.

use smelt_sql_core::link::Row;
use smelt_sql_core::schema::{FieldMeta, SqlType};
use smelt_sql_core::value::SqlValue;

use super::{DdlDialect, LiveColumn};

/// SQLite migration dialect.
#[derive(Debug, Clone, Default)]
pub struct SqliteDdl;

impl DdlDialect for SqliteDdl {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Boolean => String::from("BOOLEAN"),
            SqlType::SmallInt => String::from("SMALLINT"),
            SqlType::Integer => String::from("INTEGER"),
            SqlType::BigInt => String::from("BIGINT"),
            SqlType::Real => String::from("REAL"),
            SqlType::Double => String::from("DOUBLE"),
            SqlType::Decimal(p, s) => format!("DECIMAL({p},{s})"),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Text => String::from("TEXT"),
            SqlType::Blob => String::from("BLOB"),
            SqlType::Date => String::from("DATE"),
            SqlType::Time => String::from("TIME"),
            SqlType::Timestamp => String::from("DATETIME"),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "AUTOINCREMENT"
    }

    fn column_definition(&self, column: &FieldMeta) -> String {
        // AUTOINCREMENT requires the exact phrase INTEGER PRIMARY KEY,
        // whatever integer width was declared.
        if column.primary_key && column.auto_increment {
            let mut def = format!(
                "{} INTEGER PRIMARY KEY AUTOINCREMENT",
                self.quote(&column.column)
            );
            if let Some(ref default_expr) = column.default_expr {
                def.push_str(&format!(" DEFAULT {default_expr}"));
            }
            return def;
        }

        let mut parts = vec![
            self.quote(&column.column),
            self.type_name(&column.sql_type),
        ];
        if column.primary_key {
            parts.push(String::from("PRIMARY KEY"));
        } else if !column.nullable {
            parts.push(String::from("NOT NULL"));
        }
        if let Some(ref default_expr) = column.default_expr {
            parts.push(format!("DEFAULT {default_expr}"));
        }
        parts.join(" ")
    }

    fn modify_column_sql(&self, _table: &str, _column: &FieldMeta) -> Vec<String> {
        Vec::new()
    }

    fn introspect_sql(&self, table: &str) -> (String, Vec<SqlValue>) {
        // PRAGMA does not take bound parameters; the table name comes from
        // Record::table_name, not user input.
        (format!("PRAGMA table_info(\"{table}\")"), Vec::new())
    }

    fn parse_live_columns(&self, rows: &[Row]) -> Vec<LiveColumn> {
        rows.iter()
            .filter_map(|row| {
                let name = row.text("name")?.to_string();
                let type_name = row
                    .text("type")
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                let primary_key = row.int("pk").unwrap_or(0) != 0;
                let notnull = row.int("notnull").unwrap_or(0) != 0;
                Some(LiveColumn {
                    name,
                    type_name,
                    nullable: !notnull && !primary_key,
                    primary_key,
                })
            })
            .collect()
    }
}
