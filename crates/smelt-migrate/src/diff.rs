//! Schema comparison.
//!
//! Compares a record's declared columns against the live catalog and
//! produces the DDL statements closing the gap. The comparison is
//! additive: columns present in the database but absent from the record
//! are left alone, and nothing is ever dropped.

use smelt_sql_core::schema::FieldMeta;

use crate::dialect::{DdlDialect, LiveColumn};

/// The statements bringing one table up to a record's declared shape.
#[derive(Debug, Default)]
pub struct MigrationPlan {
    /// DDL statements in execution order.
    pub statements: Vec<String>,
    /// Columns that drifted but cannot be altered in place on this
    /// dialect.
    pub skipped_columns: Vec<String>,
}

impl MigrationPlan {
    /// Returns whether the live table already matches the declaration.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Plans the DDL for one table.
///
/// An empty `live` slice means the table does not exist and gets created
/// whole; otherwise each declared column is added or altered
/// individually. Primary-key columns are never altered after creation.
pub fn plan(
    ddl: &dyn DdlDialect,
    table: &str,
    desired: &[FieldMeta],
    live: &[LiveColumn],
) -> MigrationPlan {
    let mut out = MigrationPlan::default();

    if live.is_empty() {
        out.statements.push(ddl.create_table_sql(table, desired));
        return out;
    }

    for column in desired {
        let Some(existing) = live
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(&column.column))
        else {
            out.statements.push(ddl.add_column_sql(table, column));
            continue;
        };

        if column.primary_key {
            continue;
        }

        if column_matches(ddl, column, existing) {
            continue;
        }

        let alters = ddl.modify_column_sql(table, column);
        if alters.is_empty() {
            out.skipped_columns.push(column.column.clone());
        } else {
            out.statements.extend(alters);
        }
    }

    out
}

/// Returns whether a live column already satisfies the declaration.
fn column_matches(ddl: &dyn DdlDialect, desired: &FieldMeta, live: &LiveColumn) -> bool {
    types_match(&ddl.type_name(&desired.sql_type), &live.type_name)
        && desired.nullable == live.nullable
}

/// Compares a declared type against the catalog's normalized rendering.
///
/// Parameterized declarations (`VARCHAR(100)`) must match the full live
/// string; bare declarations compare against the live base name so that
/// `INT` still matches a catalog's `int(11)`.
fn types_match(declared: &str, live: &str) -> bool {
    let declared = declared.to_ascii_lowercase();
    if declared.contains('(') {
        return declared == live;
    }
    let live_base = live.split('(').next().unwrap_or(live).trim();
    declared == live_base
}

#[cfg(test)]
mod tests {
    use smelt_sql_core::schema::SqlType;

    use super::*;
    use crate::dialect::{MySqlDdl, SqliteDdl};

    fn live(name: &str, type_name: &str, nullable: bool) -> LiveColumn {
        LiveColumn {
            name: String::from(name),
            type_name: String::from(type_name),
            nullable,
            primary_key: false,
        }
    }

    #[test]
    fn test_missing_table_plans_create() {
        let desired = vec![
            FieldMeta::new("id", SqlType::BigInt)
                .primary_key()
                .auto_increment(),
            FieldMeta::new("name", SqlType::Varchar(100)),
        ];
        let out = plan(&MySqlDdl, "user", &desired, &[]);
        assert_eq!(
            out.statements,
            vec![
                "CREATE TABLE `user` (`id` BIGINT PRIMARY KEY AUTO_INCREMENT, \
                 `name` VARCHAR(100) NOT NULL)"
            ]
        );
        assert!(out.skipped_columns.is_empty());
    }

    #[test]
    fn test_missing_column_plans_add() {
        let desired = vec![
            FieldMeta::new("id", SqlType::BigInt).primary_key(),
            FieldMeta::new("email", SqlType::Varchar(255)).nullable(),
        ];
        let existing = vec![live("id", "bigint", false)];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert_eq!(
            out.statements,
            vec!["ALTER TABLE `user` ADD COLUMN `email` VARCHAR(255)"]
        );
    }

    #[test]
    fn test_matching_schema_is_noop() {
        let desired = vec![
            FieldMeta::new("id", SqlType::BigInt).primary_key(),
            FieldMeta::new("name", SqlType::Varchar(100)),
            FieldMeta::new("age", SqlType::Integer),
        ];
        let existing = vec![
            live("id", "bigint", false),
            live("name", "varchar(100)", false),
            live("age", "int(11)", false),
        ];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert!(out.is_noop());
    }

    #[test]
    fn test_type_drift_plans_modify() {
        let desired = vec![FieldMeta::new("name", SqlType::Varchar(200))];
        let existing = vec![live("name", "varchar(100)", false)];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert_eq!(
            out.statements,
            vec!["ALTER TABLE `user` MODIFY COLUMN `name` VARCHAR(200) NOT NULL"]
        );
    }

    #[test]
    fn test_nullability_drift_plans_modify() {
        let desired = vec![FieldMeta::new("bio", SqlType::Text).nullable()];
        let existing = vec![live("bio", "text", false)];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert_eq!(
            out.statements,
            vec!["ALTER TABLE `user` MODIFY COLUMN `bio` TEXT"]
        );
    }

    #[test]
    fn test_primary_key_is_never_altered() {
        let desired = vec![FieldMeta::new("id", SqlType::Integer).primary_key()];
        let existing = vec![live("id", "bigint", false)];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert!(out.is_noop());
    }

    #[test]
    fn test_postgres_timestamp_column_is_stable() {
        use crate::dialect::PostgresDdl;

        let desired = vec![
            FieldMeta::new("id", SqlType::BigInt)
                .primary_key()
                .auto_increment(),
            FieldMeta::new("created_at", SqlType::Timestamp),
        ];
        // Normalized shape of a catalog's `timestamp without time zone`.
        let existing = vec![
            live("id", "bigint", false),
            live("created_at", "timestamp", false),
        ];
        let out = plan(&PostgresDdl, "event", &desired, &existing);
        assert!(out.is_noop());
    }

    #[test]
    fn test_sqlite_drift_is_skipped_not_altered() {
        let desired = vec![FieldMeta::new("name", SqlType::Varchar(200))];
        let existing = vec![live("name", "varchar(100)", false)];
        let out = plan(&SqliteDdl, "user", &desired, &existing);
        assert!(out.statements.is_empty());
        assert_eq!(out.skipped_columns, vec!["name"]);
    }

    #[test]
    fn test_extra_live_columns_are_preserved() {
        let desired = vec![FieldMeta::new("id", SqlType::BigInt).primary_key()];
        let existing = vec![
            live("id", "bigint", false),
            live("legacy_notes", "text", true),
        ];
        let out = plan(&MySqlDdl, "user", &desired, &existing);
        assert!(out.is_noop(), "unknown columns must never be dropped");
    }

    #[test]
    fn test_bare_type_matches_parameterized_live_type() {
        assert!(types_match("INT", "int(11)"));
        assert!(types_match("bigint", "bigint"));
        assert!(!types_match("VARCHAR(100)", "varchar(255)"));
        assert!(types_match("VARCHAR(255)", "varchar(255)"));
    }
}
