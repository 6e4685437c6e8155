// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! View selection types: sort mode, class filter and grouped output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ResultRecord;

/// Ordering applied inside each class group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Name ascending, case-insensitive
    #[default]
    Name,
    /// Sprint time ascending, missing times last
    Sprint,
    /// Jump distance descending, missing distances last
    Jump,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Name, SortMode::Sprint, SortMode::Jump];

    /// Stable key used in URLs and JSON.
    pub fn key(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Sprint => "sprint",
            SortMode::Jump => "jump",
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Name => "Klasse → Name",
            SortMode::Sprint => "Klasse → Sprintzeit",
            SortMode::Jump => "Klasse → Sprungweite",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown sort mode: {0}")]
pub struct UnknownSortMode(pub String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.key() == s)
            .ok_or_else(|| UnknownSortMode(s.to_string()))
    }
}

/// Label shown when no class filter is active.
pub const ALL_CLASSES_LABEL: &str = "Alle Klassen";

/// Active view selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub sort: SortMode,
    /// Trimmed class value to show, `None` for all classes
    pub class_filter: Option<String>,
}

impl ViewQuery {
    /// Build a query, treating a blank filter as "all classes".
    pub fn new(sort: SortMode, class_filter: Option<&str>) -> Self {
        Self {
            sort,
            class_filter: class_filter
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        }
    }
}

/// Records sharing one class value, in display order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    /// Trimmed class name, `None` for the group without class
    pub class_name: Option<String>,
    pub label: String,
    pub results: Vec<ResultRecord>,
}

/// Fully derived list view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub sort: SortMode,
    pub class_filter: Option<String>,
    pub known_classes: Vec<String>,
    pub groups: Vec<ClassGroup>,
}

impl ResultsView {
    /// Number of records across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
