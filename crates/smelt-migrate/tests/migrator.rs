//! Migrator behavior against a scripted connection.

use std::cell::RefCell;
use std::collections::VecDeque;

use smelt_migrate::{MigrateError, Migrator};
use smelt_sql_core::dialect::Dialect;
use smelt_sql_core::link::{Link, LinkError, Row};
use smelt_sql_core::schema::{FieldMeta, Record, Settable};
use smelt_sql_core::value::SqlValue;
use smelt_sql_derive::Record;

/// A connection that replays scripted query results and records every
/// statement it is asked to execute.
struct FakeLink {
    dialect: Dialect,
    query_results: RefCell<VecDeque<Result<Vec<Row>, LinkError>>>,
    executed: RefCell<Vec<String>>,
    queried: RefCell<Vec<String>>,
}

impl FakeLink {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            query_results: RefCell::new(VecDeque::new()),
            executed: RefCell::new(Vec::new()),
            queried: RefCell::new(Vec::new()),
        }
    }

    fn script(self, result: Result<Vec<Row>, LinkError>) -> Self {
        self.query_results.borrow_mut().push_back(result);
        self
    }

    fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }
}

impl Link for FakeLink {
    fn driver_name(&self) -> Dialect {
        self.dialect
    }

    fn execute(&self, sql: &str, _params: &[SqlValue]) -> Result<u64, LinkError> {
        self.executed.borrow_mut().push(String::from(sql));
        Ok(0)
    }

    fn query(&self, sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, LinkError> {
        self.queried.borrow_mut().push(String::from(sql));
        self.query_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Builds one MySQL information_schema row.
fn mysql_column(name: &str, column_type: &str, nullable: bool) -> Row {
    let base = column_type.split('(').next().unwrap_or(column_type);
    Row::new(
        vec![
            String::from("COLUMN_NAME"),
            String::from("DATA_TYPE"),
            String::from("COLUMN_TYPE"),
            String::from("IS_NULLABLE"),
        ],
        vec![
            SqlValue::Text(String::from(name)),
            SqlValue::Text(String::from(base)),
            SqlValue::Text(String::from(column_type)),
            SqlValue::Text(String::from(if nullable { "YES" } else { "NO" })),
        ],
    )
}

/// Builds one Postgres information_schema row, as the catalog spells its
/// type names.
fn pg_column(name: &str, data_type: &str, max_length: Option<i64>, nullable: bool) -> Row {
    Row::new(
        vec![
            String::from("column_name"),
            String::from("data_type"),
            String::from("character_maximum_length"),
            String::from("is_nullable"),
        ],
        vec![
            SqlValue::Text(String::from(name)),
            SqlValue::Text(String::from(data_type)),
            max_length.map_or(SqlValue::Null, SqlValue::Int),
            SqlValue::Text(String::from(if nullable { "YES" } else { "NO" })),
        ],
    )
}

/// Builds one SQL Server INFORMATION_SCHEMA row.
fn mssql_column(name: &str, data_type: &str, max_length: Option<i64>, nullable: bool) -> Row {
    Row::new(
        vec![
            String::from("COLUMN_NAME"),
            String::from("DATA_TYPE"),
            String::from("CHARACTER_MAXIMUM_LENGTH"),
            String::from("IS_NULLABLE"),
        ],
        vec![
            SqlValue::Text(String::from(name)),
            SqlValue::Text(String::from(data_type)),
            max_length.map_or(SqlValue::Null, SqlValue::Int),
            SqlValue::Text(String::from(if nullable { "YES" } else { "NO" })),
        ],
    )
}

/// Builds one SQLite PRAGMA table_info row.
fn sqlite_column(name: &str, type_name: &str, notnull: bool, pk: bool) -> Row {
    Row::new(
        vec![
            String::from("name"),
            String::from("type"),
            String::from("notnull"),
            String::from("pk"),
        ],
        vec![
            SqlValue::Text(String::from(name)),
            SqlValue::Text(String::from(type_name)),
            SqlValue::Int(i64::from(notnull)),
            SqlValue::Int(i64::from(pk)),
        ],
    )
}

#[derive(Record, Default)]
struct Account {
    #[column(primary_key, autoincrement)]
    id: Settable<i64>,
    #[column(max_length = 100)]
    email: Settable<String>,
    active: Settable<bool>,
}

#[test]
fn missing_table_is_created() {
    let link = FakeLink::new(Dialect::MySql).script(Ok(Vec::new()));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    let expected = "CREATE TABLE `account` (\
                    `id` BIGINT PRIMARY KEY AUTO_INCREMENT, \
                    `email` VARCHAR(100) NOT NULL, \
                    `active` TINYINT(1) NOT NULL)";
    assert_eq!(outcome.statements, vec![expected]);
    assert_eq!(link.executed(), vec![expected]);
}

#[test]
fn matching_table_executes_nothing() {
    let link = FakeLink::new(Dialect::MySql).script(Ok(vec![
        mysql_column("id", "bigint", false),
        mysql_column("email", "varchar(100)", false),
        mysql_column("active", "tinyint(1)", false),
    ]));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    assert!(outcome.statements.is_empty());
    assert!(outcome.skipped_columns.is_empty());
    assert!(link.executed().is_empty());
}

#[test]
fn matching_postgres_table_executes_nothing() {
    #[derive(Record, Default)]
    struct Event {
        #[column(primary_key, autoincrement)]
        id: Settable<i64>,
        #[column(max_length = 100)]
        title: Settable<String>,
        created_at: Settable<chrono::NaiveDateTime>,
        starts_at: Settable<chrono::NaiveTime>,
    }

    // The catalog reports temporal types with their verbose names and a
    // BIGSERIAL key as plain bigint.
    let link = FakeLink::new(Dialect::Postgres).script(Ok(vec![
        pg_column("id", "bigint", None, false),
        pg_column("title", "character varying", Some(100), false),
        pg_column("created_at", "timestamp without time zone", None, false),
        pg_column("starts_at", "time without time zone", None, false),
    ]));
    let outcome = Migrator::new(&link).migrate(&Event::default()).unwrap();

    assert!(outcome.statements.is_empty());
    assert!(outcome.skipped_columns.is_empty());
    assert!(link.executed().is_empty());
}

#[test]
fn matching_mssql_table_executes_nothing() {
    let link = FakeLink::new(Dialect::Mssql).script(Ok(vec![
        mssql_column("id", "bigint", None, false),
        mssql_column("email", "nvarchar", Some(100), false),
        mssql_column("active", "bit", None, false),
    ]));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    assert!(outcome.statements.is_empty());
    assert!(outcome.skipped_columns.is_empty());
    assert!(link.executed().is_empty());
}

#[test]
fn new_columns_are_added() {
    let link = FakeLink::new(Dialect::MySql)
        .script(Ok(vec![mysql_column("id", "bigint", false)]));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    assert_eq!(
        outcome.statements,
        vec![
            "ALTER TABLE `account` ADD COLUMN `email` VARCHAR(100) NOT NULL",
            "ALTER TABLE `account` ADD COLUMN `active` TINYINT(1) NOT NULL",
        ]
    );
}

#[test]
fn drifted_column_is_modified_on_mysql() {
    let link = FakeLink::new(Dialect::MySql).script(Ok(vec![
        mysql_column("id", "bigint", false),
        mysql_column("email", "varchar(50)", false),
        mysql_column("active", "tinyint(1)", false),
    ]));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    assert_eq!(
        outcome.statements,
        vec!["ALTER TABLE `account` MODIFY COLUMN `email` VARCHAR(100) NOT NULL"]
    );
}

#[test]
fn sqlite_drift_is_skipped_with_report() {
    let link = FakeLink::new(Dialect::Sqlite).script(Ok(vec![
        sqlite_column("id", "INTEGER", false, true),
        sqlite_column("email", "VARCHAR(50)", true, false),
        sqlite_column("active", "BOOLEAN", false, false),
    ]));
    let outcome = Migrator::new(&link).migrate(&Account::default()).unwrap();

    assert!(outcome.statements.is_empty());
    assert_eq!(outcome.skipped_columns, vec!["email", "active"]);
    assert!(link.executed().is_empty());
}

#[test]
fn batch_isolates_failures_per_table() {
    #[derive(Record, Default)]
    struct Session {
        #[column(primary_key)]
        token: Settable<String>,
    }

    // First introspection fails, second succeeds.
    let link = FakeLink::new(Dialect::MySql)
        .script(Err(LinkError::Driver(String::from("connection reset"))))
        .script(Ok(Vec::new()));

    let account = Account::default();
    let session = Session::default();
    let records: [&dyn Record; 2] = [&account, &session];
    let reports = Migrator::new(&link).auto_migrate(&records);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].table, "account");
    assert!(matches!(
        reports[0].result,
        Err(MigrateError::Introspection { .. })
    ));
    assert_eq!(reports[1].table, "session");
    assert!(reports[1].result.is_ok());
    assert_eq!(
        link.executed(),
        vec!["CREATE TABLE `session` (`token` VARCHAR(255) PRIMARY KEY)"]
    );
}

#[test]
fn failed_ddl_stops_the_table() {
    struct RefusingLink;

    impl Link for RefusingLink {
        fn driver_name(&self) -> Dialect {
            Dialect::MySql
        }
        fn execute(&self, _sql: &str, _params: &[SqlValue]) -> Result<u64, LinkError> {
            Err(LinkError::Driver(String::from("read-only replica")))
        }
        fn query(&self, _sql: &str, _params: &[SqlValue]) -> Result<Vec<Row>, LinkError> {
            Ok(Vec::new())
        }
    }

    let err = Migrator::new(&RefusingLink)
        .migrate(&Account::default())
        .unwrap_err();
    assert!(matches!(err, MigrateError::Ddl { .. }));
}

#[test]
fn empty_record_is_rejected() {
    struct Nothing;

    impl Record for Nothing {
        fn table_name(&self) -> String {
            String::from("nothing")
        }
        fn fields(&self) -> Vec<FieldMeta> {
            Vec::new()
        }
    }

    let link = FakeLink::new(Dialect::MySql);
    let err = Migrator::new(&link).migrate(&Nothing).unwrap_err();
    assert!(matches!(err, MigrateError::EmptyRecord { table } if table == "nothing"));
}

#[test]
fn show_create_table_reads_mysql_output() {
    let link = FakeLink::new(Dialect::MySql).script(Ok(vec![Row::new(
        vec![String::from("Table"), String::from("Create Table")],
        vec![
            SqlValue::Text(String::from("account")),
            SqlValue::Text(String::from("CREATE TABLE `account` (...)")),
        ],
    )]));

    let ddl = Migrator::new(&link).show_create_table("account").unwrap();
    assert_eq!(ddl, "CREATE TABLE `account` (...)");
    assert_eq!(link.queried.borrow()[0], "SHOW CREATE TABLE `account`");
}

#[test]
fn show_create_table_is_empty_elsewhere() {
    let link = FakeLink::new(Dialect::Postgres);
    let ddl = Migrator::new(&link).show_create_table("account").unwrap();
    assert_eq!(ddl, "");
    assert!(link.queried.borrow().is_empty());
}
