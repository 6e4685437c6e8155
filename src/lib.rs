// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Athletik: record athletic test results on a single device
//!
//! This crate stores long jump and sprint results per athlete and class in
//! a local SQLite table, derives grouped and sorted views of them, and
//! exports everything as semicolon-separated text. The UI is a small HTML
//! page served on the loopback interface.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::SharedSnapshot;
use services::ResultsCoordinator;
use tokio::sync::watch;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub coordinator: ResultsCoordinator,
    /// The UI's live subscription; keeps the coordinator state current.
    pub ui_feed: watch::Receiver<SharedSnapshot>,
}

impl AppState {
    /// Build the state and attach the UI subscription to `coordinator`.
    pub fn new(config: Config, coordinator: ResultsCoordinator) -> Self {
        let ui_feed = coordinator.subscribe();
        Self {
            config,
            coordinator,
            ui_feed,
        }
    }
}
