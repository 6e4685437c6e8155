// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View-state coordinator between the result store and the UI.
//!
//! The coordinator keeps the latest store snapshot as reactive state and
//! forwards mutation intents to the store:
//! - Subscribers get a `watch` receiver that is updated on every store change.
//! - The store subscription starts with the first subscriber and is released
//!   once no subscriber has been attached for the grace period.
//! - `add_or_update` and `delete` are queued and applied in order by one
//!   writer task; callers never wait for the store.

use crate::db::{ResultStore, SharedSnapshot};
use crate::error::Result;
use crate::models::{NewResult, ResultRecord, ResultsView, ViewQuery};
use crate::services::{export, views};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};

/// How long the store subscription outlives its last subscriber.
pub const SUBSCRIPTION_GRACE: Duration = Duration::from_secs(5);

/// Queued mutation intents, applied in order.
enum Intent {
    Insert(NewResult),
    Update(ResultRecord),
    Delete(i64),
    Flush(oneshot::Sender<()>),
}

/// Coordinator handle. Cheap to clone; all clones share one state.
#[derive(Clone)]
pub struct ResultsCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    store: ResultStore,
    intents: mpsc::UnboundedSender<Intent>,
    state_tx: watch::Sender<SharedSnapshot>,
    sharing: Mutex<Sharing>,
    grace: Duration,
}

#[derive(Default)]
struct Sharing {
    upstream_active: bool,
}

impl Inner {
    fn lock_sharing(&self) -> MutexGuard<'_, Sharing> {
        self.sharing.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ResultsCoordinator {
    /// Create a coordinator over `store` and start its writer task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: ResultStore) -> Self {
        Self::with_grace_period(store, SUBSCRIPTION_GRACE)
    }

    /// Like [`ResultsCoordinator::new`] with a custom subscription grace period.
    pub fn with_grace_period(store: ResultStore, grace: Duration) -> Self {
        let (intents, intent_rx) = mpsc::unbounded_channel();
        let initial = store.observe_all().borrow().clone();
        let (state_tx, _) = watch::channel(initial);

        tokio::spawn(run_writer(store.clone(), intent_rx));

        Self {
            inner: Arc::new(Inner {
                store,
                intents,
                state_tx,
                sharing: Mutex::new(Sharing::default()),
                grace,
            }),
        }
    }

    /// Subscribe to the live snapshot (newest record first).
    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        let mut sharing = self.inner.lock_sharing();
        let rx = self.inner.state_tx.subscribe();
        if !sharing.upstream_active {
            sharing.upstream_active = true;
            tracing::debug!("Starting store subscription");
            tokio::spawn(share_upstream(self.inner.clone()));
        }
        rx
    }

    /// Whether the store subscription is currently held.
    pub fn is_upstream_active(&self) -> bool {
        self.inner.lock_sharing().upstream_active
    }

    /// Latest snapshot held by the coordinator.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.inner.state_tx.borrow().clone()
    }

    /// Grouped, filtered and sorted view of the latest snapshot.
    pub fn view(&self, query: &ViewQuery) -> ResultsView {
        views::build_view(&self.snapshot().records, query)
    }

    /// Distinct class names of the latest snapshot.
    pub fn known_classes(&self) -> Vec<String> {
        views::known_classes(&self.snapshot().records)
    }

    /// Insert a new record (`id == None`) or replace the record with `id`.
    ///
    /// A blank class name is stored as no class. Returns immediately; the
    /// result shows up in the snapshot once persisted.
    pub fn add_or_update(&self, id: Option<i64>, mut fields: NewResult) {
        if fields
            .class_name
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            fields.class_name = None;
        }

        let intent = match id {
            None => Intent::Insert(fields),
            Some(id) => Intent::Update(ResultRecord::from_new(id, fields)),
        };
        self.dispatch(intent);
    }

    /// Delete the record with `id`. Returns immediately.
    pub fn delete(&self, id: i64) {
        self.dispatch(Intent::Delete(id));
    }

    fn dispatch(&self, intent: Intent) {
        if self.inner.intents.send(intent).is_err() {
            tracing::error!("Writer task is gone, dropping intent");
        }
    }

    /// Wait until every intent queued so far is applied and visible in
    /// [`ResultsCoordinator::snapshot`].
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.dispatch(Intent::Flush(done_tx));
        if done_rx.await.is_err() {
            return;
        }

        let target = self.inner.store.observe_all().borrow().generation;
        let mut state = self.subscribe();
        loop {
            let generation = state.borrow_and_update().generation;
            if generation >= target || state.changed().await.is_err() {
                break;
            }
        }
    }

    /// Write every record (oldest first) as CSV into `sink`.
    pub async fn export_csv<W>(&self, sink: &mut W) -> Result<usize>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let records = self.inner.store.get_all_once().await?;
        let written = export::write_csv(&records, sink).await?;
        tracing::info!(records = records.len(), bytes = written, "Exported results");
        Ok(written)
    }
}

/// Apply queued intents to the store, one at a time.
async fn run_writer(store: ResultStore, mut intents: mpsc::UnboundedReceiver<Intent>) {
    while let Some(intent) = intents.recv().await {
        match intent {
            Intent::Insert(fields) => match store.insert(&fields).await {
                Ok(id) => tracing::info!(id, "Result added"),
                Err(e) => tracing::error!(error = %e, "Failed to add result"),
            },
            Intent::Update(record) => match store.update(&record).await {
                Ok(true) => tracing::info!(id = record.id, "Result updated"),
                Ok(false) => tracing::debug!(id = record.id, "Update ignored, result not found"),
                Err(e) => tracing::error!(id = record.id, error = %e, "Failed to update result"),
            },
            Intent::Delete(id) => match store.delete_by_id(id).await {
                Ok(true) => tracing::info!(id, "Result deleted"),
                Ok(false) => tracing::debug!(id, "Delete ignored, result not found"),
                Err(e) => tracing::error!(id, error = %e, "Failed to delete result"),
            },
            Intent::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("Intent queue closed, writer stopped");
}

/// Forward store snapshots to subscribers until none is left for `grace`.
async fn share_upstream(inner: Arc<Inner>) {
    let mut upstream = inner.store.observe_all();
    forward(&inner, upstream.borrow_and_update().clone());

    let mut idle_deadline: Option<Instant> = None;
    loop {
        tokio::select! {
            changed = upstream.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = upstream.borrow_and_update().clone();
                forward(&inner, snapshot);
            }
            _ = inner.state_tx.closed(), if idle_deadline.is_none() => {
                idle_deadline = Some(Instant::now() + inner.grace);
            }
            _ = sleep_until(idle_deadline.unwrap_or_else(Instant::now)), if idle_deadline.is_some() => {
                if release_if_idle(&inner) {
                    tracing::debug!("Released store subscription after grace period");
                    return;
                }
                idle_deadline = None;
            }
        }
    }

    inner.lock_sharing().upstream_active = false;
}

/// Publish `snapshot` unless subscribers already hold a newer one.
fn forward(inner: &Inner, snapshot: SharedSnapshot) {
    inner.state_tx.send_if_modified(|current| {
        if snapshot.generation > current.generation {
            *current = snapshot;
            true
        } else {
            false
        }
    });
}

fn release_if_idle(inner: &Inner) -> bool {
    let mut sharing = inner.lock_sharing();
    if inner.state_tx.receiver_count() == 0 {
        sharing.upstream_active = false;
        true
    } else {
        false
    }
}
