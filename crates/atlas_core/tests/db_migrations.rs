use atlas_core::db::migrations::latest_version;
use atlas_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;
use tempfile::TempDir;

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_applies_migrations_and_mirrors_user_version() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), latest_version());

    for table in ["continent", "country", "region"] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "table `{table}` should exist");
    }
}

#[test]
fn open_enables_foreign_key_enforcement() {
    let conn = open_db_in_memory().unwrap();

    let fk_on: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(fk_on, 1);

    let result = conn.execute(
        "INSERT INTO country (country_code, name, continent_id) VALUES ('KE', 'Kenya', 9999);",
        [],
    );
    assert!(result.is_err(), "orphan parent reference must be rejected");
}

#[test]
fn code_uniqueness_is_a_store_constraint() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO continent (continent_code, name) VALUES ('AF', 'Africa');",
        [],
    )
    .unwrap();
    let result = conn.execute(
        "INSERT INTO continent (continent_code, name) VALUES ('AF', 'Twin');",
        [],
    );
    assert!(result.is_err(), "duplicate code must be rejected");
}

#[test]
fn reopening_an_existing_file_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("atlas.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute(
            "INSERT INTO continent (continent_code, name) VALUES ('AF', 'Africa');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), latest_version());

    let name: String = conn
        .query_row(
            "SELECT name FROM continent WHERE continent_code = 'AF';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "Africa");
}

#[test]
fn schema_newer_than_binary_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("atlas.db");

    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion { db_version: 99, .. }
    ));
}

#[test]
fn non_db_extension_is_rejected_without_creating_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("atlas.sqlite3");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::NotDatabaseFile(_)));
    assert!(!path.exists());
}
