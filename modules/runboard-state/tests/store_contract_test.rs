//! Slice store contract tests.
//!
//! These verify the per-collection guarantees without touching the
//! synchronizer: identifier uniqueness under any create/update/delete
//! sequence, no-op semantics for absent targets, wholesale page replacement,
//! and bookmark-wrapper unwrapping.

use chrono::{TimeZone, Utc};
use runboard_common::entities::{Bookmark, Experiment, Project};
use runboard_common::types::{EntityName, RunStatus};
use runboard_state::events::SliceEvent;
use runboard_state::Collection;
use uuid::Uuid;

// =========================================================================
// Fixtures
// =========================================================================

fn experiment(name: &str) -> Experiment {
    let unique_name = EntityName::new(name);
    let project = unique_name
        .project_name()
        .unwrap_or_else(|| EntityName::new("u.p"));
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Experiment {
        uuid: Uuid::new_v4(),
        unique_name: unique_name.clone(),
        project,
        group: unique_name.group_name(),
        description: None,
        config: None,
        last_status: Some(RunStatus::Running),
        last_metrics: None,
        bookmarked: false,
        created_at: ts,
        updated_at: ts,
        started_at: Some(ts),
        finished_at: None,
        jobs: vec![],
        num_jobs: 0,
    }
}

fn project(name: &str) -> Project {
    let unique_name = EntityName::new(name);
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Project {
        uuid: Uuid::new_v4(),
        name: unique_name
            .as_str()
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string(),
        unique_name: unique_name.clone(),
        owner: unique_name.owner().unwrap_or_default().to_string(),
        description: None,
        is_public: true,
        bookmarked: false,
        created_at: ts,
        updated_at: ts,
        groups: vec![],
        experiments: vec![],
        jobs: vec![],
        builds: vec![],
        num_groups: 0,
        num_experiments: 0,
        num_jobs: 0,
        num_builds: 0,
    }
}

fn names(collection: &Collection<Experiment>) -> Vec<String> {
    collection
        .items
        .iter()
        .map(|e| e.unique_name.as_str().to_string())
        .collect()
}

fn assert_unique_identifiers(collection: &Collection<Experiment>) {
    let mut seen = std::collections::HashSet::new();
    for item in &collection.items {
        assert!(
            seen.insert(item.unique_name.as_str().to_string()),
            "duplicate identifier: {}",
            item.unique_name
        );
    }
}

// =========================================================================
// Identifier uniqueness
// =========================================================================

#[test]
fn create_update_delete_sequences_never_duplicate_identifiers() {
    let mut collection = Collection::<Experiment>::default();

    let events = vec![
        SliceEvent::Created { entity: experiment("u.p.1") },
        SliceEvent::Created { entity: experiment("u.p.2") },
        // Same identifier created again — server retry or duplicate dispatch.
        SliceEvent::Created { entity: experiment("u.p.1") },
        SliceEvent::Updated { entity: experiment("u.p.2") },
        SliceEvent::OneReceived { entity: experiment("u.p.2") },
        SliceEvent::Deleted { name: EntityName::new("u.p.1") },
        SliceEvent::Created { entity: experiment("u.p.3") },
        SliceEvent::OneReceived { entity: experiment("u.p.4") },
    ];

    for event in &events {
        collection.apply(event);
        assert_unique_identifiers(&collection);
    }

    assert_eq!(names(&collection), vec!["u.p.4", "u.p.3", "u.p.2"]);
}

#[test]
fn duplicate_create_replaces_in_place_without_count_change() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::Created { entity: experiment("u.p.1") });
    collection.apply(&SliceEvent::Created { entity: experiment("u.p.2") });
    assert_eq!(collection.count, 2);

    collection.apply(&SliceEvent::Created { entity: experiment("u.p.2") });
    assert_eq!(collection.count, 2);
    assert_eq!(collection.items.len(), 2);
}

// =========================================================================
// Delete semantics
// =========================================================================

#[test]
fn delete_absent_identifier_is_a_noop() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::Created { entity: experiment("u.p.1") });

    let before_items = names(&collection);
    let before_count = collection.count;

    collection.apply(&SliceEvent::Deleted { name: EntityName::new("u.p.99") });

    assert_eq!(names(&collection), before_items);
    assert_eq!(collection.count, before_count);
}

#[test]
fn delete_removes_item_and_decrements_count() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2")],
        count: 7,
    });

    collection.apply(&SliceEvent::Deleted { name: EntityName::new("u.p.1") });

    assert_eq!(names(&collection), vec!["u.p.2"]);
    assert_eq!(collection.count, 6);
}

// =========================================================================
// Receive semantics
// =========================================================================

#[test]
fn page_received_replaces_wholesale_and_clears_loading() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::FetchRequested);
    assert!(collection.loading);
    collection.apply(&SliceEvent::FetchRequested);
    assert!(collection.loading, "request marking is idempotent");

    collection.apply(&SliceEvent::Created { entity: experiment("u.p.9") });
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2")],
        count: 12,
    });

    assert_eq!(names(&collection), vec!["u.p.1", "u.p.2"]);
    assert_eq!(collection.count, 12);
    assert!(!collection.loading);
}

#[test]
fn page_received_drops_duplicate_rows_keeping_first() {
    let mut collection = Collection::<Experiment>::default();
    let mut first = experiment("u.p.1");
    first.description = Some("first".into());
    let mut dup = experiment("u.p.1");
    dup.description = Some("second".into());

    collection.apply(&SliceEvent::PageReceived {
        results: vec![first, dup, experiment("u.p.2")],
        count: 3,
    });

    assert_eq!(names(&collection), vec!["u.p.1", "u.p.2"]);
    assert_eq!(collection.items[0].description.as_deref(), Some("first"));
}

#[test]
fn one_received_prepends_new_and_replaces_existing_in_place() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2")],
        count: 2,
    });

    // Unknown identifier lands at the head and is now counted.
    collection.apply(&SliceEvent::OneReceived { entity: experiment("u.p.3") });
    assert_eq!(names(&collection), vec!["u.p.3", "u.p.1", "u.p.2"]);
    assert_eq!(collection.count, 3);

    // Known identifier keeps its position.
    let mut updated = experiment("u.p.2");
    updated.description = Some("refreshed".into());
    collection.apply(&SliceEvent::OneReceived { entity: updated });
    assert_eq!(names(&collection), vec!["u.p.3", "u.p.1", "u.p.2"]);
    assert_eq!(collection.count, 3);
    assert_eq!(collection.items[2].description.as_deref(), Some("refreshed"));
}

#[test]
fn update_preserves_position_and_ignores_unknown_identifiers() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2"), experiment("u.p.3")],
        count: 3,
    });

    let mut updated = experiment("u.p.2");
    updated.description = Some("tuned".into());
    collection.apply(&SliceEvent::Updated { entity: updated });

    assert_eq!(names(&collection), vec!["u.p.1", "u.p.2", "u.p.3"]);
    assert_eq!(collection.items[1].description.as_deref(), Some("tuned"));

    let before = names(&collection);
    collection.apply(&SliceEvent::Updated { entity: experiment("u.p.77") });
    assert_eq!(names(&collection), before);
    assert_eq!(collection.count, 3);
}

// =========================================================================
// Flag events never change membership
// =========================================================================

#[test]
fn stop_sets_status_without_changing_membership() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2")],
        count: 2,
    });

    collection.apply(&SliceEvent::Stopped { name: EntityName::new("u.p.1") });

    assert_eq!(collection.items[0].last_status, Some(RunStatus::Stopped));
    assert_eq!(names(&collection), vec!["u.p.1", "u.p.2"]);
    assert_eq!(collection.count, 2);

    // Absent target: nothing changes, nothing panics.
    collection.apply(&SliceEvent::Stopped { name: EntityName::new("u.p.42") });
    assert_eq!(collection.count, 2);
}

#[test]
fn status_change_touches_only_the_named_item() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::PageReceived {
        results: vec![experiment("u.p.1"), experiment("u.p.2")],
        count: 2,
    });

    collection.apply(&SliceEvent::StatusChanged {
        name: EntityName::new("u.p.2"),
        status: RunStatus::Succeeded,
    });

    assert_eq!(collection.items[0].last_status, Some(RunStatus::Running));
    assert_eq!(collection.items[1].last_status, Some(RunStatus::Succeeded));
}

#[test]
fn bookmark_toggles_flag_in_place() {
    let mut collection = Collection::<Experiment>::default();
    collection.apply(&SliceEvent::Created { entity: experiment("u.p.1") });

    collection.apply(&SliceEvent::Bookmarked { name: EntityName::new("u.p.1") });
    assert!(collection.items[0].bookmarked);

    collection.apply(&SliceEvent::Unbookmarked { name: EntityName::new("u.p.1") });
    assert!(!collection.items[0].bookmarked);
}

// =========================================================================
// Bookmark listings
// =========================================================================

#[test]
fn bookmarks_received_unwraps_every_wrapper() {
    let mut collection = Collection::<Project>::default();

    let wrappers = vec![
        Bookmark { content_object: project("u.alpha") },
        Bookmark { content_object: project("u.beta") },
    ];
    collection.apply(&SliceEvent::BookmarksReceived {
        results: wrappers,
        count: 5,
    });

    assert_eq!(collection.items.len(), 2);
    assert_eq!(collection.count, 5, "count mirrors the wrapper payload");
    assert_eq!(collection.items[0].unique_name, EntityName::new("u.alpha"));
    assert_eq!(collection.items[1].unique_name, EntityName::new("u.beta"));
}
