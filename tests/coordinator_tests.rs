// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coordinator behavior under concurrent use.

use athletik::db::ResultStore;
use athletik::models::{NewResult, SortMode, ViewQuery};
use athletik::services::ResultsCoordinator;
use std::sync::Arc;

async fn coordinator() -> ResultsCoordinator {
    ResultsCoordinator::new(ResultStore::open_in_memory().await.unwrap())
}

#[tokio::test]
async fn test_concurrent_adds_are_all_applied() {
    let coordinator = Arc::new(coordinator().await);
    let _feed = coordinator.subscribe();

    let mut handles = Vec::new();
    for task in 0..8 {
        let coordinator = coordinator.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                let class_name = Some(format!("Klasse {}", task)).filter(|_| task % 2 == 0);
                coordinator.add_or_update(
                    None,
                    NewResult::new(class_name, format!("Athlet {}-{}", task, i), None, Some(8.0)),
                );
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    coordinator.flush().await;

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.records.len(), 80);

    let mut ids: Vec<i64> = snapshot.records.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 80);
}

#[tokio::test]
async fn test_intents_apply_in_submission_order() {
    let coordinator = coordinator().await;
    let _feed = coordinator.subscribe();

    coordinator.add_or_update(None, NewResult::new(None, "Max", Some(4.0), None));
    coordinator.flush().await;
    let id = coordinator.snapshot().records[0].id;

    // Update then delete then update again: the record stays deleted.
    coordinator.add_or_update(Some(id), NewResult::new(None, "Moritz", Some(4.2), None));
    coordinator.delete(id);
    coordinator.add_or_update(Some(id), NewResult::new(None, "Zombie", None, None));
    coordinator.flush().await;

    assert!(coordinator.snapshot().records.is_empty());
}

#[tokio::test]
async fn test_view_tracks_selection() {
    let coordinator = coordinator().await;
    let _feed = coordinator.subscribe();

    for (class, name, sprint) in [
        (Some("10a"), "Max", Some(8.4)),
        (Some("10a"), "Lena", Some(7.9)),
        (None, "Tom", None),
        (Some("9b"), "Ida", Some(8.0)),
    ] {
        coordinator.add_or_update(
            None,
            NewResult::new(class.map(String::from), name, None, sprint),
        );
    }
    coordinator.flush().await;

    let all = coordinator.view(&ViewQuery::new(SortMode::Sprint, None));
    assert_eq!(all.len(), 4);
    let labels: Vec<&str> = all.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["(keine Klasse)", "10a", "9b"]);

    let class_10a = coordinator.view(&ViewQuery::new(SortMode::Sprint, Some("10a")));
    let names: Vec<&str> = class_10a.groups[0]
        .results
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Lena", "Max"]);
    assert_eq!(class_10a.known_classes, vec!["10a", "9b"]);
}
