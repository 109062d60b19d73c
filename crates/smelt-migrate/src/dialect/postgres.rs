//! PostgreSQL DDL dialect.

use smelt_sql_core::link::Row;
use smelt_sql_core::schema::{FieldMeta, SqlType};
use smelt_sql_core::value::SqlValue;

use super::{parse_information_schema_rows, DdlDialect, LiveColumn};

/// PostgreSQL migration dialect.
#[derive(Debug, Clone, Default)]
pub struct PostgresDdl;

impl DdlDialect for PostgresDdl {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn type_name(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Boolean => String::from("BOOLEAN"),
            SqlType::SmallInt => String::from("SMALLINT"),
            SqlType::Integer => String::from("INTEGER"),
            SqlType::BigInt => String::from("BIGINT"),
            SqlType::Real => String::from("REAL"),
            SqlType::Double => String::from("DOUBLE PRECISION"),
            SqlType::Decimal(p, s) => format!("DECIMAL({p},{s})"),
            SqlType::Varchar(n) => format!("VARCHAR({n})"),
            SqlType::Text => String::from("TEXT"),
            SqlType::Blob => String::from("BYTEA"),
            SqlType::Date => String::from("DATE"),
            SqlType::Time => String::from("TIME"),
            SqlType::Timestamp => String::from("TIMESTAMP"),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn auto_increment_keyword(&self) -> &'static str {
        // Unused: auto-increment keys become SERIAL pseudo-types instead.
        ""
    }

    fn column_definition(&self, column: &FieldMeta) -> String {
        if column.primary_key && column.auto_increment {
            let serial = match column.sql_type {
                SqlType::BigInt => "BIGSERIAL",
                _ => "SERIAL",
            };
            let mut def = format!("{} {serial} PRIMARY KEY", self.quote(&column.column));
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

    fn modify_column_sql(&self, table: &str, column: &FieldMeta) -> Vec<String> {
        let table = self.quote(table);
        let col = self.quote(&column.column);
        let null_clause = if column.nullable {
            "DROP NOT NULL"
        } else {
            "SET NOT NULL"
        };
        vec![
            format!(
                "ALTER TABLE {table} ALTER COLUMN {col} TYPE {}",
                self.type_name(&column.sql_type)
            ),
            format!("ALTER TABLE {table} ALTER COLUMN {col} {null_clause}"),
        ]
    }

    fn introspect_sql(&self, table: &str) -> (String, Vec<SqlValue>) {
        (
            String::from(
                "SELECT column_name, data_type, character_maximum_length, \
                 numeric_precision, numeric_scale, is_nullable \
                 FROM information_schema.columns \
                 WHERE table_schema = 'public' AND table_name = ? \
                 ORDER BY ordinal_position",
            ),
            vec![SqlValue::Text(String::from(table))],
        )
    }

    fn parse_live_columns(&self, rows: &[Row]) -> Vec<LiveColumn> {
        // The catalog spells out verbose names for several types; fold
        // them back to the names the generator declares.
        parse_information_schema_rows(rows, |row, data_type| match data_type {
            "character varying" => match row.int("character_maximum_length") {
                Some(n) => format!("varchar({n})"),
                None => String::from("varchar"),
            },
            "numeric" => {
                match (row.int("numeric_precision"), row.int("numeric_scale")) {
                    (Some(p), Some(s)) => format!("decimal({p},{s})"),
                    _ => String::from("decimal"),
                }
            }
            "timestamp without time zone" => String::from("timestamp"),
            "timestamp with time zone" => String::from("timestamptz"),
            "time without time zone" => String::from("time"),
            "time with time zone" => String::from("timetz"),
            other => String::from(other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_increment_key_becomes_serial() {
        let id = FieldMeta::new("id", SqlType::BigInt)
            .primary_key()
            .auto_increment();
        assert_eq!(
            PostgresDdl.column_definition(&id),
            "\"id\" BIGSERIAL PRIMARY KEY"
        );

        let small = FieldMeta::new("id", SqlType::Integer)
            .primary_key()
            .auto_increment();
        assert_eq!(
            PostgresDdl.column_definition(&small),
            "\"id\" SERIAL PRIMARY KEY"
        );
    }

    #[test]
    fn test_modify_splits_type_and_nullability() {
        let column = FieldMeta::new("bio", SqlType::Text).nullable();
        assert_eq!(
            PostgresDdl.modify_column_sql("user", &column),
            vec![
                "ALTER TABLE \"user\" ALTER COLUMN \"bio\" TYPE TEXT",
                "ALTER TABLE \"user\" ALTER COLUMN \"bio\" DROP NOT NULL",
            ]
        );
    }

    #[test]
    fn test_time_zone_qualifiers_normalize() {
        let row = |name: &str, data_type: &str| {
            Row::new(
                vec![
                    String::from("column_name"),
                    String::from("data_type"),
                    String::from("is_nullable"),
                ],
                vec![
                    SqlValue::Text(String::from(name)),
                    SqlValue::Text(String::from(data_type)),
                    SqlValue::Text(String::from("NO")),
                ],
            )
        };
        let rows = vec![
            row("created_at", "timestamp without time zone"),
            row("synced_at", "timestamp with time zone"),
            row("opens_at", "time without time zone"),
        ];
        let live = PostgresDdl.parse_live_columns(&rows);
        assert_eq!(live[0].type_name, "timestamp");
        assert_eq!(live[1].type_name, "timestamptz");
        assert_eq!(live[2].type_name, "time");
    }

    #[test]
    fn test_character_varying_normalizes_to_varchar() {
        let rows = vec![Row::new(
            vec![
                String::from("column_name"),
                String::from("data_type"),
                String::from("character_maximum_length"),
                String::from("is_nullable"),
            ],
            vec![
                SqlValue::Text(String::from("name")),
                SqlValue::Text(String::from("character varying")),
                SqlValue::Int(100),
                SqlValue::Text(String::from("NO")),
            ],
        )];
        let live = PostgresDdl.parse_live_columns(&rows);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].type_name, "varchar(100)");
        assert!(!live[0].nullable);
    }
}
