//! End-to-end tests against a real in-memory SQLite database.

use smelt_migrate::Migrator;
use smelt_sql_core::builder::QueryBuilder;
use smelt_sql_core::cond::Cond;
use smelt_sql_core::link::Link;
use smelt_sql_core::schema::Settable;
use smelt_sql_derive::Record;
use smelt_sql_rusqlite::SqliteLink;

#[derive(Record, Default)]
struct Note {
    #[column(primary_key, autoincrement)]
    id: Settable<i64>,
    #[column(max_length = 80)]
    title: Settable<String>,
    body: Settable<Option<String>>,
    pinned: Settable<bool>,
}

fn note(title: &str, pinned: bool) -> Note {
    let mut n = Note::default();
    n.title.assign(String::from(title));
    n.pinned.assign(pinned);
    n
}

#[test]
fn migrate_insert_and_query_round_trip() {
    let link = SqliteLink::open_in_memory().unwrap();
    let migrator = Migrator::new(&link);

    let outcome = migrator.migrate(&Note::default()).unwrap();
    assert_eq!(outcome.statements.len(), 1);
    assert!(outcome.statements[0].starts_with("CREATE TABLE \"note\""));

    for record in [note("groceries", false), note("standup", true)] {
        let (sql, params) = QueryBuilder::for_link(&link)
            .build_insert(&record)
            .unwrap();
        assert_eq!(link.execute(&sql, &params).unwrap(), 1);
    }

    let (sql, params) = QueryBuilder::for_link(&link)
        .table("note")
        .select(Note::id())
        .select(Note::title())
        .filter(Cond::eq(Note::pinned(), true))
        .build_select()
        .unwrap();
    let rows = link.query(&sql, &params).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text("title"), Some("standup"));
    assert_eq!(rows[0].int("id"), Some(2));
}

#[test]
fn second_migration_is_a_noop() {
    let link = SqliteLink::open_in_memory().unwrap();
    let migrator = Migrator::new(&link);

    migrator.migrate(&Note::default()).unwrap();
    let outcome = migrator.migrate(&Note::default()).unwrap();

    assert!(outcome.statements.is_empty());
    assert!(outcome.skipped_columns.is_empty());
}

#[test]
fn new_field_becomes_an_added_column() {
    #[derive(Record, Default)]
    #[table(name = "note")]
    struct NoteV2 {
        #[column(primary_key, autoincrement)]
        id: Settable<i64>,
        #[column(max_length = 80)]
        title: Settable<String>,
        body: Settable<Option<String>>,
        pinned: Settable<bool>,
        archived_at: Settable<Option<chrono::NaiveDateTime>>,
    }

    let link = SqliteLink::open_in_memory().unwrap();
    let migrator = Migrator::new(&link);
    migrator.migrate(&Note::default()).unwrap();

    let outcome = migrator.migrate(&NoteV2::default()).unwrap();
    assert_eq!(
        outcome.statements,
        vec!["ALTER TABLE \"note\" ADD COLUMN \"archived_at\" DATETIME"]
    );

    // The new column is immediately usable.
    let rows = link
        .query("PRAGMA table_info(\"note\")", &[])
        .unwrap();
    assert!(rows.iter().any(|r| r.text("name") == Some("archived_at")));
}

#[test]
fn explicit_null_and_pagination_run_against_sqlite() {
    let link = SqliteLink::open_in_memory().unwrap();
    Migrator::new(&link).migrate(&Note::default()).unwrap();

    for i in 0..5 {
        let mut n = note(&format!("note-{i}"), false);
        n.body.assign(None);
        let (sql, params) = QueryBuilder::for_link(&link).build_insert(&n).unwrap();
        link.execute(&sql, &params).unwrap();
    }

    let (sql, params) = QueryBuilder::for_link(&link)
        .table("note")
        .select(Note::title())
        .order_asc(Note::id())
        .limit(2)
        .offset(2)
        .build_select()
        .unwrap();
    assert!(sql.ends_with("LIMIT ?,?"));

    let rows = link.query(&sql, &params).unwrap();
    let titles: Vec<_> = rows.iter().filter_map(|r| r.text("title")).collect();
    assert_eq!(titles, vec!["note-2", "note-3"]);
}
