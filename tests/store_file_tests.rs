// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! On-disk store tests: persistence across reopen and the v1 upgrade.

use athletik::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use athletik::db::ResultStore;
use athletik::models::NewResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use tempfile::TempDir;

async fn create_v1_database(path: &Path) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            jumpMeters REAL NOT NULL,
            sprintSeconds REAL NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    for (name, jump, sprint) in [("Max", 4.5, 8.2), ("Lena", 4.1, 7.9), ("Tom", 3.8, 9.0)] {
        sqlx::query("INSERT INTO results (name, jumpMeters, sprintSeconds) VALUES (?, ?, ?)")
            .bind(name)
            .bind(jump)
            .bind(sprint)
            .execute(&pool)
            .await
            .unwrap();
    }
    sqlx::query("DELETE FROM results WHERE name = 'Tom'")
        .execute(&pool)
        .await
        .unwrap();

    pool.close().await;
}

#[tokio::test]
async fn test_v1_database_is_upgraded_on_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.db");
    create_v1_database(&path).await;

    let store = ResultStore::open(&path).await.unwrap();

    let records = store.get_all_once().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].name, "Max");
    assert_eq!(records[0].class_name, None);
    assert_eq!(records[0].jump_meters, Some(4.5));
    assert_eq!(records[0].sprint_seconds, Some(8.2));
    assert_eq!(records[1].id, 2);
    assert_eq!(records[1].name, "Lena");

    // The deleted ID 3 stays retired.
    let id = store
        .insert(&NewResult::new(Some("10a".to_string()), "Ida", None, None))
        .await
        .unwrap();
    assert_eq!(id, 4);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("results.db");

    {
        let store = ResultStore::open(&path).await.unwrap();
        store
            .insert(&NewResult::new(Some("9b".to_string()), "Ida", Some(3.9), None))
            .await
            .unwrap();
    }

    let store = ResultStore::open(&path).await.unwrap();
    let records = store.get_all_once().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].class_name.as_deref(), Some("9b"));
    assert_eq!(records[0].jump_meters, Some(3.9));
    assert_eq!(records[0].sprint_seconds, None);

    let snapshot = store.observe_all().borrow().clone();
    assert_eq!(snapshot.records, records);
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.db");
    create_v1_database(&path).await;
    drop(ResultStore::open(&path).await.unwrap());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(&path))
        .await
        .unwrap();
    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}

/// Table layout written by the earlier device app: nullable class and
/// results already present, no version bookkeeping.
async fn create_device_app_database(path: &Path) {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    for sql in [
        r#"
        CREATE TABLE IF NOT EXISTS `results` (
            `id` INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            `className` TEXT,
            `name` TEXT NOT NULL,
            `jumpMeters` REAL,
            `sprintSeconds` REAL
        )
        "#,
        "CREATE TABLE IF NOT EXISTS room_master_table (id INTEGER PRIMARY KEY, identity_hash TEXT)",
    ] {
        sqlx::query(sql).execute(&pool).await.unwrap();
    }

    for (class_name, name, jump, sprint) in [
        (Some("10a"), "Max", Some(4.5), None),
        (None, "Lena", None, Some(7.9)),
        (Some("9b"), "Tom", Some(3.8), Some(9.0)),
        (Some("  "), "Ida", None, None),
    ] {
        sqlx::query(
            "INSERT INTO results (className, name, jumpMeters, sprintSeconds) VALUES (?, ?, ?, ?)",
        )
        .bind(class_name)
        .bind(name)
        .bind(jump)
        .bind(sprint)
        .execute(&pool)
        .await
        .unwrap();
    }
    sqlx::query("DELETE FROM results WHERE name = 'Ida'")
        .execute(&pool)
        .await
        .unwrap();

    pool.close().await;
}

#[tokio::test]
async fn test_device_app_database_is_adopted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.db");
    create_device_app_database(&path).await;

    let store = ResultStore::open(&path).await.unwrap();

    let records = store.get_all_once().await.unwrap();
    let rows: Vec<(i64, Option<&str>, &str, Option<f64>, Option<f64>)> = records
        .iter()
        .map(|r| {
            (
                r.id,
                r.class_name.as_deref(),
                r.name.as_str(),
                r.jump_meters,
                r.sprint_seconds,
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (1, Some("10a"), "Max", Some(4.5), None),
            (2, None, "Lena", None, Some(7.9)),
            (3, Some("9b"), "Tom", Some(3.8), Some(9.0)),
        ]
    );

    let id = store
        .insert(&NewResult::new(None, "Neu", None, None))
        .await
        .unwrap();
    assert_eq!(id, 5);
    drop(store);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(&path))
        .await
        .unwrap();
    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}
