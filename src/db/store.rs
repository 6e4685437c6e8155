// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite-backed result store with snapshot publication.
//!
//! Every successful mutation re-reads the table and publishes the full
//! list (newest ID first) on a `watch` channel. Writes are serialized by a
//! single-connection pool plus a write lock that also covers publication,
//! so observers see snapshots in write order.

use crate::db::migrations;
use crate::error::{AppError, Result};
use crate::models::{NewResult, ResultRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Point-in-time list of all records, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Incremented on every publication, starting at 0 when the store opens
    pub generation: u64,
    pub records: Vec<ResultRecord>,
}

/// Shared handle to a published snapshot.
pub type SharedSnapshot = Arc<Snapshot>;

const SELECT_COLUMNS: &str = "SELECT id, className, name, jumpMeters, sprintSeconds FROM results";

fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}

/// Result store handle. Cheap to clone.
#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    pool: SqlitePool,
    write_lock: Mutex<()>,
    snapshot_tx: watch::Sender<SharedSnapshot>,
}

impl ResultStore {
    /// Open (or create) the database file and apply pending migrations.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Database(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let newly_created = !db_path.exists();
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let store = Self::connect(options).await?;

        if newly_created {
            tracing::info!(path = %db_path.display(), "Initialized new database");
        } else {
            tracing::info!(path = %db_path.display(), "Opened existing database");
        }

        Ok(store)
    }

    /// Open a private in-memory database (tests and demos).
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(db_err)?;
        Self::connect(options).await
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        // One connection: serializes writes and keeps an in-memory database alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        migrations::run_migrations(&pool).await?;

        let initial = fetch_all(&pool, "ORDER BY id DESC").await?;
        tracing::debug!(count = initial.len(), "Loaded initial snapshot");
        let (snapshot_tx, _) = watch::channel(Arc::new(Snapshot {
            generation: 0,
            records: initial,
        }));

        Ok(Self {
            inner: Arc::new(StoreInner {
                pool,
                write_lock: Mutex::new(()),
                snapshot_tx,
            }),
        })
    }

    /// Subscribe to the live list of all records, newest ID first.
    ///
    /// The receiver holds the current snapshot immediately; a new one is
    /// published after every mutation. Dropping the receiver unsubscribes.
    pub fn observe_all(&self) -> watch::Receiver<SharedSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// One-shot read of all records, oldest ID first.
    pub async fn get_all_once(&self) -> Result<Vec<ResultRecord>> {
        fetch_all(&self.inner.pool, "ORDER BY id ASC").await
    }

    /// Insert a record and return its newly assigned ID.
    pub async fn insert(&self, fields: &NewResult) -> Result<i64> {
        let _guard = self.inner.write_lock.lock().await;

        let id = sqlx::query(
            "INSERT INTO results (className, name, jumpMeters, sprintSeconds) VALUES (?, ?, ?, ?)",
        )
        .bind(&fields.class_name)
        .bind(&fields.name)
        .bind(fields.jump_meters)
        .bind(fields.sprint_seconds)
        .execute(&self.inner.pool)
        .await
        .map_err(db_err)?
        .last_insert_rowid();

        tracing::debug!(id, "Inserted result");
        self.publish().await;
        Ok(id)
    }

    /// Replace all fields of the record with `record.id`.
    ///
    /// Returns `false` if no such record exists; the table is left unchanged.
    pub async fn update(&self, record: &ResultRecord) -> Result<bool> {
        let _guard = self.inner.write_lock.lock().await;

        let affected = sqlx::query(
            "UPDATE results SET className = ?, name = ?, jumpMeters = ?, sprintSeconds = ? WHERE id = ?",
        )
        .bind(&record.class_name)
        .bind(&record.name)
        .bind(record.jump_meters)
        .bind(record.sprint_seconds)
        .bind(record.id)
        .execute(&self.inner.pool)
        .await
        .map_err(db_err)?
        .rows_affected();

        if affected == 0 {
            tracing::debug!(id = record.id, "Update skipped, no such result");
            return Ok(false);
        }

        tracing::debug!(id = record.id, "Updated result");
        self.publish().await;
        Ok(true)
    }

    /// Delete the record with `id`. Returns `false` if it did not exist.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let _guard = self.inner.write_lock.lock().await;

        let affected = sqlx::query("DELETE FROM results WHERE id = ?")
            .bind(id)
            .execute(&self.inner.pool)
            .await
            .map_err(db_err)?
            .rows_affected();

        if affected == 0 {
            tracing::debug!(id, "Delete skipped, no such result");
            return Ok(false);
        }

        tracing::debug!(id, "Deleted result");
        self.publish().await;
        Ok(true)
    }

    /// Re-read the table and publish it to observers. Caller holds the write lock.
    ///
    /// The write is already committed, so a failed re-read only leaves
    /// observers on the previous snapshot until the next mutation.
    async fn publish(&self) {
        let records = match fetch_all(&self.inner.pool, "ORDER BY id DESC").await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Write saved but snapshot not published");
                return;
            }
        };
        let generation = self.inner.snapshot_tx.borrow().generation + 1;
        self.inner
            .snapshot_tx
            .send_replace(Arc::new(Snapshot { generation, records }));
    }
}

async fn fetch_all(pool: &SqlitePool, order: &str) -> Result<Vec<ResultRecord>> {
    let sql = format!("{} {}", SELECT_COLUMNS, order);
    sqlx::query_as::<_, ResultRecord>(&sql)
        .fetch_all(pool)
        .await
        .map_err(db_err)
}
