// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived list views: known classes, class filter, grouping and sorting.
//!
//! All functions are pure over a snapshot so they can be recomputed
//! whenever the snapshot or the view selection changes.

use crate::models::{ClassGroup, ResultRecord, ResultsView, SortMode, ViewQuery, NO_CLASS_LABEL};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Case-insensitive ordering with the exact text as tie-breaker.
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct non-blank trimmed class names, sorted case-insensitively.
pub fn known_classes(records: &[ResultRecord]) -> Vec<String> {
    let mut classes: Vec<String> = records
        .iter()
        .filter_map(ResultRecord::class_key)
        .map(String::from)
        .collect();
    classes.sort_by(|a, b| cmp_ignore_case(a, b));
    classes.dedup();
    classes
}

/// Records matching the class filter (all records when `None`).
pub fn filter_by_class<'a>(
    records: &'a [ResultRecord],
    class_filter: Option<&str>,
) -> Vec<&'a ResultRecord> {
    match class_filter {
        None => records.iter().collect(),
        Some(wanted) => records
            .iter()
            .filter(|r| r.class_name.as_deref().unwrap_or("").trim() == wanted)
            .collect(),
    }
}

/// Within-group ordering for a sort mode.
///
/// Missing sprint times and jump distances always sort last.
pub fn compare_within_group(mode: SortMode, a: &ResultRecord, b: &ResultRecord) -> Ordering {
    match mode {
        SortMode::Name => cmp_lowercase(&a.name, &b.name),
        SortMode::Sprint => match (a.sprint_seconds, b.sprint_seconds) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortMode::Jump => match (a.jump_meters, b.jump_meters) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn cmp_lowercase(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Group key that orders buckets case-insensitively.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    folded: String,
    exact: String,
}

impl BucketKey {
    fn new(label: &str) -> Self {
        Self {
            folded: label.to_lowercase(),
            exact: label.to_string(),
        }
    }
}

/// Bucket records by trimmed class and sort each bucket.
///
/// The group without class comes first. Sorting is stable, so records
/// comparing equal keep their input order.
pub fn group_and_sort<'a, I>(records: I, mode: SortMode) -> Vec<ClassGroup>
where
    I: IntoIterator<Item = &'a ResultRecord>,
{
    let mut buckets: BTreeMap<Option<BucketKey>, Vec<ResultRecord>> = BTreeMap::new();
    for record in records {
        buckets
            .entry(record.class_key().map(BucketKey::new))
            .or_default()
            .push(record.clone());
    }

    buckets
        .into_iter()
        .map(|(key, mut results)| {
            results.sort_by(|a, b| compare_within_group(mode, a, b));
            let class_name = key.map(|k| k.exact);
            ClassGroup {
                label: class_name.clone().unwrap_or_else(|| NO_CLASS_LABEL.to_string()),
                class_name,
                results,
            }
        })
        .collect()
}

/// Compute the complete list view for a snapshot and selection.
pub fn build_view(records: &[ResultRecord], query: &ViewQuery) -> ResultsView {
    let filtered = filter_by_class(records, query.class_filter.as_deref());
    ResultsView {
        sort: query.sort,
        class_filter: query.class_filter.clone(),
        known_classes: known_classes(records),
        groups: group_and_sort(filtered, query.sort),
    }
}
