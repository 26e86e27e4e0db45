//! Identifiers and shared enums for dashboard resources.
//!
//! Every resource is addressed by a dotted unique name combining owner,
//! parent, and local id: `"alice.vision"` (project), `"alice.vision.3"`
//! (group), `"alice.vision.3.12"` (grouped experiment). All derivations are
//! total — a name that does not carry the requested prefix yields `None`,
//! never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Identifiers ---

/// Dotted unique name of a dashboard resource.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityName(String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    /// First segment — the owning username.
    pub fn owner(&self) -> Option<&str> {
        self.segments().next().filter(|s| !s.is_empty())
    }

    /// `"<owner>.<project>"` prefix, for any name scoped under a project.
    pub fn project_name(&self) -> Option<EntityName> {
        self.prefix(2)
    }

    /// Group prefix of a grouped experiment name (`"u.p.g.e"` → `"u.p.g"`).
    /// Independent experiments (`"u.p.e"`) have no group.
    pub fn group_name(&self) -> Option<EntityName> {
        if self.segment_count() == 4 {
            self.prefix(3)
        } else {
            None
        }
    }

    /// Experiment prefix of a job name (`"u.p.e.j"` → `"u.p.e"`,
    /// `"u.p.g.e.j"` → `"u.p.g.e"`). Project-level jobs have none.
    pub fn experiment_name(&self) -> Option<EntityName> {
        if self.segment_count() >= 4 {
            self.parent()
        } else {
            None
        }
    }

    /// Everything but the final segment.
    pub fn parent(&self) -> Option<EntityName> {
        let n = self.segment_count();
        if n < 2 {
            return None;
        }
        self.prefix(n - 1)
    }

    fn prefix(&self, n: usize) -> Option<EntityName> {
        let segments: Vec<&str> = self.segments().collect();
        if segments.len() < n || segments[..n].iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(EntityName(segments[..n].join(".")))
    }

    /// Segments joined with `/`, for route construction.
    pub fn url_path(&self) -> String {
        self.0.replace('.', "/")
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityName({})", self.0)
    }
}

impl From<&str> for EntityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EntityName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

// --- Enums ---

/// The six resource types the dashboard tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Group,
    Experiment,
    Job,
    Build,
    User,
}

impl ResourceKind {
    /// Path segment used by list and bookmark routes.
    pub fn url_segment(&self) -> &'static str {
        match self {
            ResourceKind::Project => "projects",
            ResourceKind::Group => "groups",
            ResourceKind::Experiment => "experiments",
            ResourceKind::Job => "jobs",
            ResourceKind::Build => "builds",
            ResourceKind::User => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Project => write!(f, "project"),
            ResourceKind::Group => write!(f, "group"),
            ResourceKind::Experiment => write!(f, "experiment"),
            ResourceKind::Job => write!(f, "job"),
            ResourceKind::Build => write!(f, "build"),
            ResourceKind::User => write!(f, "user"),
        }
    }
}

/// Lifecycle status of a run-like resource (experiment, job, build).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Created,
    Building,
    Scheduled,
    Starting,
    Running,
    Succeeded,
    Failed,
    Stopped,
    Warning,
    Unknown,
}

impl RunStatus {
    /// Terminal statuses — the run will not transition again on its own.
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Stopped
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Created => write!(f, "created"),
            RunStatus::Building => write!(f, "building"),
            RunStatus::Scheduled => write!(f, "scheduled"),
            RunStatus::Starting => write!(f, "starting"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Succeeded => write!(f, "succeeded"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Stopped => write!(f, "stopped"),
            RunStatus::Warning => write!(f, "warning"),
            RunStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_name_is_first_two_segments() {
        let experiment = EntityName::new("alice.vision.3.12");
        assert_eq!(
            experiment.project_name(),
            Some(EntityName::new("alice.vision"))
        );
    }

    #[test]
    fn group_name_only_for_four_segment_names() {
        let grouped = EntityName::new("alice.vision.3.12");
        assert_eq!(grouped.group_name(), Some(EntityName::new("alice.vision.3")));

        let independent = EntityName::new("alice.vision.12");
        assert_eq!(independent.group_name(), None);
    }

    #[test]
    fn experiment_name_of_job_drops_final_segment() {
        let job = EntityName::new("alice.vision.12.2");
        assert_eq!(
            job.experiment_name(),
            Some(EntityName::new("alice.vision.12"))
        );

        let grouped_job = EntityName::new("alice.vision.3.12.2");
        assert_eq!(
            grouped_job.experiment_name(),
            Some(EntityName::new("alice.vision.3.12"))
        );

        let project_job = EntityName::new("alice.vision.7");
        assert_eq!(project_job.experiment_name(), None);
    }

    #[test]
    fn malformed_names_yield_none_not_errors() {
        assert_eq!(EntityName::new("").owner(), None);
        assert_eq!(EntityName::new("alice").project_name(), None);
        assert_eq!(EntityName::new("alice..3").project_name(), None);
        assert_eq!(EntityName::new("alice").parent(), None);
    }

    #[test]
    fn url_path_swaps_dots_for_slashes() {
        assert_eq!(
            EntityName::new("alice.vision.3").url_path(),
            "alice/vision/3"
        );
    }

    #[test]
    fn run_status_terminality() {
        assert!(RunStatus::Stopped.is_done());
        assert!(RunStatus::Failed.is_done());
        assert!(!RunStatus::Running.is_done());
        assert!(!RunStatus::Warning.is_done());
    }
}
