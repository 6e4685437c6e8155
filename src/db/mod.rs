// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (SQLite).

pub mod migrations;
pub mod store;

pub use store::{ResultStore, SharedSnapshot, Snapshot};

/// Table names as constants.
pub mod tables {
    pub const RESULTS: &str = "results";
}
