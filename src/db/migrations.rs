// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Versioned schema migrations for the `results` table.
//!
//! The applied version is recorded in `schema_version`. A database created
//! before version tracking existed has a `results` table but no version
//! rows; it is treated as v1.
//!
//! Schema history:
//! - v1: `name`, `jumpMeters` and `sprintSeconds` all `NOT NULL`, no class.
//! - v2: optional `className`, nullable numeric fields.

use crate::db::tables;
use crate::error::{AppError, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

/// Current schema version. Increment when adding a migration.
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Latest applied schema version, 0 if none was recorded.
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i64> {
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .map_err(db_err)?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(conn: &mut SqliteConnection, version: i64) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn table_exists(conn: &mut SqliteConnection, table: &str) -> Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)")
        .bind(table)
        .fetch_one(conn)
        .await
        .map_err(db_err)
}

async fn column_exists(conn: &mut SqliteConnection, table: &str, column: &str) -> Result<bool> {
    let sql = format!("SELECT COUNT(*) FROM pragma_table_info('{table}') WHERE name = ?");
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(column)
        .fetch_one(conn)
        .await
        .map_err(db_err)?;
    Ok(count > 0)
}

/// Bring the schema up to [`CURRENT_SCHEMA_VERSION`].
///
/// Each step runs in its own transaction together with its version record.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;

    let mut current_version = get_schema_version(pool).await?;

    if current_version == 0 {
        let mut tx = pool.begin().await.map_err(db_err)?;
        if table_exists(&mut tx, tables::RESULTS).await? {
            info!("Found unversioned results table, treating as schema v1");
            set_schema_version(&mut tx, 1).await?;
            current_version = 1;
        } else {
            create_results_table(&mut tx, tables::RESULTS).await?;
            set_schema_version(&mut tx, CURRENT_SCHEMA_VERSION).await?;
            info!(version = CURRENT_SCHEMA_VERSION, "Created results table");
            current_version = CURRENT_SCHEMA_VERSION;
        }
        tx.commit().await.map_err(db_err)?;
    }

    if current_version == CURRENT_SCHEMA_VERSION {
        info!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            db_version = current_version,
            code_version = CURRENT_SCHEMA_VERSION,
            "Database schema is newer than this build, leaving it untouched"
        );
        return Ok(());
    }

    info!(
        from = current_version,
        to = CURRENT_SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 2 {
        let mut tx = pool.begin().await.map_err(db_err)?;
        migrate_v2(&mut tx).await?;
        set_schema_version(&mut tx, 2).await?;
        tx.commit().await.map_err(db_err)?;
        info!("Migration v2 completed");
    }

    Ok(())
}

/// Create the results table with the current column set.
async fn create_results_table(conn: &mut SqliteConnection, table: &str) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            className TEXT,
            name TEXT NOT NULL,
            jumpMeters REAL,
            sprintSeconds REAL
        )
        "#
    );
    sqlx::query(&sql).execute(conn).await.map_err(db_err)?;
    Ok(())
}

/// Migration v2: add `className` and make the numeric columns nullable.
///
/// SQLite cannot drop `NOT NULL` in place, so the table is rebuilt. IDs are
/// copied verbatim and the AUTOINCREMENT counter is carried over so deleted
/// IDs are never handed out again.
async fn migrate_v2(conn: &mut SqliteConnection) -> Result<()> {
    info!("Running migration v2: add className, allow missing results");

    if column_exists(conn, tables::RESULTS, "className").await? {
        info!("className column already exists, skipping rebuild");
        return Ok(());
    }

    const STAGING: &str = "results_v2";

    let old_seq: Option<i64> =
        sqlx::query_scalar("SELECT seq FROM sqlite_sequence WHERE name = ?")
            .bind(tables::RESULTS)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)?;

    create_results_table(conn, STAGING).await?;

    let copied = sqlx::query(
        r#"
        INSERT INTO results_v2 (id, className, name, jumpMeters, sprintSeconds)
        SELECT id, NULL, name, jumpMeters, sprintSeconds FROM results
        "#,
    )
    .execute(&mut *conn)
    .await
    .map_err(db_err)?
    .rows_affected();

    if let Some(seq) = old_seq {
        let updated = sqlx::query("UPDATE sqlite_sequence SET seq = MAX(seq, ?) WHERE name = ?")
            .bind(seq)
            .bind(STAGING)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?
            .rows_affected();
        if updated == 0 {
            sqlx::query("INSERT INTO sqlite_sequence (name, seq) VALUES (?, ?)")
                .bind(STAGING)
                .bind(seq)
                .execute(&mut *conn)
                .await
                .map_err(db_err)?;
        }
    }

    sqlx::query("DROP TABLE results")
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
    sqlx::query("ALTER TABLE results_v2 RENAME TO results")
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;

    info!(rows = copied, "Rebuilt results table");
    Ok(())
}
