//! MySQL DDL dialect.

use smelt_sql_core::link::Row;
use smelt_sql_core::schema::{FieldMeta, SqlType};
use smelt_sql_core::value::SqlValue;

use super::{parse_information_schema_rows, DdlDialect, LiveColumn};

/// MySQL migration dialect.
#[derive(Debug, Clone, Default)]
pub struct MySqlDdl;

impl DdlDialect for MySqlDdl {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote(&self, ident: &str) -> String {
        format!("`{ident}`")
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Boolean => String::from("TINYINT(1)"),
            SqlType::SmallInt => String::from("SMALLINT"),
            SqlType::Integer => String::from("INT"),
            SqlType::BigInt => String::from("BIGINT"),
            SqlType::Real => String::from("FLOAT"),
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
        "AUTO_INCREMENT"
    }

    fn modify_column_sql(&self, table: &str, column: &FieldMeta) -> Vec<String> {
        vec![format!(
            "ALTER TABLE {} MODIFY COLUMN {}",
            self.quote(table),
            self.column_definition(column)
        )]
    }

    fn introspect_sql(&self, table: &str) -> (String, Vec<SqlValue>) {
        (
            String::from(
                "SELECT COLUMN_NAME, DATA_TYPE, COLUMN_TYPE, IS_NULLABLE \
                 FROM information_schema.columns \
                 WHERE table_schema = DATABASE() AND table_name = ? \
                 ORDER BY ORDINAL_POSITION",
            ),
            vec![SqlValue::Text(String::from(table))],
        )
    }

    fn parse_live_columns(&self, rows: &[Row]) -> Vec<LiveColumn> {
        // COLUMN_TYPE carries the full rendered type (`varchar(255)`),
        // which is exactly what the generator emits.
        parse_information_schema_rows(rows, |row, data_type| {
            row.text("column_type")
                .map_or_else(|| String::from(data_type), str::to_ascii_lowercase)
        })
    }
}
