//! Cross-reference synchronizer — repairs denormalized fields that span
//! resource boundaries.
//!
//! Runs after the slice pass, reading the already-updated sibling slices and
//! the original triggering event. Expressed as an ordered table of named
//! repair stages so the chaining is visible and testable rather than
//! implicit in call nesting. A single event may be examined by several
//! stages (an experiment event touches both its project and its group).
//!
//! Repairs never fail the pipeline: a missing parent, an underivable parent
//! name, or a child the parent does not embed all mean "nothing to repair".
//! Denormalization is best-effort and self-heals on the next parent fetch.

use runboard_common::types::EntityName;
use tracing::debug;

use crate::events::{Event, SliceEvent};
use crate::resource::Resource;
use crate::snapshot::Snapshot;

/// One named repair step in the chain.
pub struct RepairStage {
    pub name: &'static str,
    run: fn(&mut Snapshot, &Event),
}

impl RepairStage {
    pub fn apply(&self, snapshot: &mut Snapshot, event: &Event) {
        (self.run)(snapshot, event);
    }
}

/// The chain, in execution order. Every parent relation appears exactly once.
pub static STAGES: &[RepairStage] = &[
    RepairStage { name: "group->project", run: group_to_project },
    RepairStage { name: "experiment->project", run: experiment_to_project },
    RepairStage { name: "experiment->group", run: experiment_to_group },
    RepairStage { name: "job->project", run: job_to_project },
    RepairStage { name: "job->experiment", run: job_to_experiment },
    RepairStage { name: "build->project", run: build_to_project },
    RepairStage { name: "project->user", run: project_to_user },
];

/// Phase 2 driver: run every stage over the new snapshot.
pub fn repair(snapshot: &mut Snapshot, event: &Event) {
    for stage in STAGES {
        stage.apply(snapshot, event);
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn group_to_project(s: &mut Snapshot, event: &Event) {
    let Event::Groups(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    let Some(parent) = resolve(&child, EntityName::project_name, "group") else {
        return;
    };
    let Some(project) = s.projects.get_mut(&parent) else {
        skip_absent("group->project", &parent);
        return;
    };
    adjust(&mut project.groups, &mut project.num_groups, &child, joined);
}

fn experiment_to_project(s: &mut Snapshot, event: &Event) {
    let Event::Experiments(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    let Some(parent) = resolve(&child, EntityName::project_name, "experiment") else {
        return;
    };
    let Some(project) = s.projects.get_mut(&parent) else {
        skip_absent("experiment->project", &parent);
        return;
    };
    adjust(
        &mut project.experiments,
        &mut project.num_experiments,
        &child,
        joined,
    );
}

fn experiment_to_group(s: &mut Snapshot, event: &Event) {
    let Event::Experiments(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    // Independent experiments have no group prefix; nothing to repair.
    let Some(parent) = child.group_name() else {
        return;
    };
    let Some(group) = s.groups.get_mut(&parent) else {
        skip_absent("experiment->group", &parent);
        return;
    };
    adjust(
        &mut group.experiments,
        &mut group.num_experiments,
        &child,
        joined,
    );
}

fn job_to_project(s: &mut Snapshot, event: &Event) {
    let Event::Jobs(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    let Some(parent) = resolve(&child, EntityName::project_name, "job") else {
        return;
    };
    let Some(project) = s.projects.get_mut(&parent) else {
        skip_absent("job->project", &parent);
        return;
    };
    adjust(&mut project.jobs, &mut project.num_jobs, &child, joined);
}

fn job_to_experiment(s: &mut Snapshot, event: &Event) {
    let Event::Jobs(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    // Project-level jobs carry no experiment prefix; nothing to repair.
    let Some(parent) = child.experiment_name() else {
        return;
    };
    let Some(experiment) = s.experiments.get_mut(&parent) else {
        skip_absent("job->experiment", &parent);
        return;
    };
    adjust(
        &mut experiment.jobs,
        &mut experiment.num_jobs,
        &child,
        joined,
    );
}

fn build_to_project(s: &mut Snapshot, event: &Event) {
    let Event::Builds(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    let Some(parent) = resolve(&child, EntityName::project_name, "build") else {
        return;
    };
    let Some(project) = s.projects.get_mut(&parent) else {
        skip_absent("build->project", &parent);
        return;
    };
    adjust(&mut project.builds, &mut project.num_builds, &child, joined);
}

fn project_to_user(s: &mut Snapshot, event: &Event) {
    let Event::Projects(ev) = event else { return };
    let Some((child, joined)) = membership_delta(ev) else {
        return;
    };
    let Some(owner) = child.owner().map(EntityName::new) else {
        debug!(child = %child, "Project name carries no owner, skipping repair");
        return;
    };
    let Some(user) = s.users.get_mut(&owner) else {
        skip_absent("project->user", &owner);
        return;
    };
    adjust(&mut user.projects, &mut user.num_projects, &child, joined);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Membership change implied by a slice event: `Some((child, true))` when the
/// child joined its parents (create, or a detail fetch the parent may not
/// know about yet), `Some((child, false))` when it left. Updates keep their
/// identifier, so embedded name lists are unaffected by them.
fn membership_delta<E: Resource>(event: &SliceEvent<E>) -> Option<(EntityName, bool)> {
    match event {
        SliceEvent::Created { entity } | SliceEvent::OneReceived { entity } => {
            Some((entity.name().clone(), true))
        }
        SliceEvent::Deleted { name } => Some((name.clone(), false)),
        SliceEvent::FetchRequested
        | SliceEvent::PageReceived { .. }
        | SliceEvent::BookmarksReceived { .. }
        | SliceEvent::Updated { .. }
        | SliceEvent::Stopped { .. }
        | SliceEvent::StatusChanged { .. }
        | SliceEvent::Bookmarked { .. }
        | SliceEvent::Unbookmarked { .. } => None,
    }
}

fn resolve(
    child: &EntityName,
    derive: fn(&EntityName) -> Option<EntityName>,
    child_kind: &'static str,
) -> Option<EntityName> {
    let parent = derive(child);
    if parent.is_none() {
        debug!(child = %child, child_kind, "Parent name underivable, skipping repair");
    }
    parent
}

/// Insert or remove `child` in a parent's embedded list; the count moves
/// only when membership actually changed.
fn adjust(list: &mut Vec<EntityName>, count: &mut i64, child: &EntityName, joined: bool) {
    if joined {
        if !list.contains(child) {
            list.push(child.clone());
            *count += 1;
        }
    } else if let Some(i) = list.iter().position(|n| n == child) {
        list.remove(i);
        *count -= 1;
    }
}

fn skip_absent(stage: &'static str, parent: &EntityName) {
    debug!(stage, parent = %parent, "Parent not loaded, nothing to repair");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_table_has_no_duplicate_relations() {
        let mut seen = std::collections::HashSet::new();
        for stage in STAGES {
            assert!(seen.insert(stage.name), "Duplicate stage: {}", stage.name);
        }
    }

    #[test]
    fn stage_table_order_is_documented_order() {
        let names: Vec<&str> = STAGES.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "group->project",
                "experiment->project",
                "experiment->group",
                "job->project",
                "job->experiment",
                "build->project",
                "project->user",
            ]
        );
    }

    #[test]
    fn adjust_is_idempotent_per_direction() {
        let mut list = vec![EntityName::new("u.p.g1")];
        let mut count = 1;

        adjust(&mut list, &mut count, &EntityName::new("u.p.g1"), true);
        assert_eq!(count, 1, "re-attaching an embedded child must not double-count");

        adjust(&mut list, &mut count, &EntityName::new("u.p.g2"), false);
        assert_eq!(count, 1, "detaching an absent child must not decrement");

        adjust(&mut list, &mut count, &EntityName::new("u.p.g1"), false);
        assert_eq!(count, 0);
        assert!(list.is_empty());
    }
}
