// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod export;
pub mod results;
pub mod views;

pub use export::{CSV_HEADER, DEFAULT_EXPORT_FILENAME};
pub use results::{ResultsCoordinator, SUBSCRIPTION_GRACE};
