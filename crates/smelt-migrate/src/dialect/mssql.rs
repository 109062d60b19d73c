//! SQL Server DDL dialect.

use smelt_sql_core::link::Row;
use smelt_sql_core::schema::{FieldMeta, SqlType};
use smelt_sql_core::value::SqlValue;

use super::{parse_information_schema_rows, DdlDialect, LiveColumn};

/// SQL Server migration dialect.
#[derive(Debug, Clone, Default)]
pub struct MssqlDdl;

impl DdlDialect for MssqlDdl {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("[{ident}]")
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Boolean => String::from("BIT"),
            SqlType::SmallInt => String::from("SMALLINT"),
            SqlType::Integer => String::from("INT"),
            SqlType::BigInt => String::from("BIGINT"),
            SqlType::Real => String::from("REAL"),
            SqlType::Double => String::from("FLOAT"),
            SqlType::Decimal(p, s) => format!("DECIMAL({p},{s})"),
            SqlType::Varchar(n) => format!("NVARCHAR({n})"),
            SqlType::Text => String::from("NVARCHAR(MAX)"),
            SqlType::Blob => String::from("VARBINARY(MAX)"),
            SqlType::Date => String::from("DATE"),
            SqlType::Time => String::from("TIME"),
            SqlType::Timestamp => String::from("DATETIME2"),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        "IDENTITY(1,1)"
    }

    fn add_column_sql(&self, table: &str, column: &FieldMeta) -> String {
        // T-SQL takes ADD without the COLUMN keyword.
        format!(
            "ALTER TABLE {} ADD {}",
            self.quote(table),
            self.column_definition(column)
        )
    }

    fn modify_column_sql(&self, table: &str, column: &FieldMeta) -> Vec<String> {
        let null_clause = if column.nullable { "NULL" } else { "NOT NULL" };
        vec![format!(
            "ALTER TABLE {} ALTER COLUMN {} {} {null_clause}",
            self.quote(table),
            self.quote(&column.column),
            self.type_name(&column.sql_type)
        )]
    }

    fn introspect_sql(&self, table: &str) -> (String, Vec<SqlValue>) {
        (
            String::from(
                "SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH, \
                 NUMERIC_PRECISION, NUMERIC_SCALE, IS_NULLABLE \
                 FROM INFORMATION_SCHEMA.COLUMNS \
                 WHERE TABLE_NAME = ? \
                 ORDER BY ORDINAL_POSITION",
            ),
            vec![SqlValue::Text(String::from(table))],
        )
    }

    fn parse_live_columns(&self, rows: &[Row]) -> Vec<LiveColumn> {
        parse_information_schema_rows(rows, |row, data_type| match data_type {
            "nvarchar" | "varchar" => match row.int("character_maximum_length") {
                // -1 is the catalog encoding for MAX.
                Some(-1) => format!("{data_type}(max)"),
                Some(n) => format!("{data_type}({n})"),
                None => String::from(data_type),
            },
            "decimal" | "numeric" => {
                match (row.int("numeric_precision"), row.int("numeric_scale")) {
                    (Some(p), Some(s)) => format!("decimal({p},{s})"),
                    _ => String::from("decimal"),
                }
            }
            other => String::from(other),
        })
    }
}
