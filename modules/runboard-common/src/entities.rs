//! Resource records as decoded from server payloads.
//!
//! Entities only ever come from the server (fetch, create, update responses);
//! the client never constructs one speculatively. Fields the server may omit
//! carry `#[serde(default)]` so older payloads still decode.
//!
//! Parents embed denormalized summaries of their children (name lists and
//! counts). Those fields are repaired by the cross-reference synchronizer
//! after every event and are best-effort snapshots, not authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{EntityName, RunStatus};

/// Auth sub-state read by the boundary adapter on every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthState {
    pub token: String,
    pub csrftoken: String,
    /// Set once an auth-class response has been observed.
    #[serde(default)]
    pub expired: bool,
}

impl AuthState {
    pub fn new(token: impl Into<String>, csrftoken: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            csrftoken: csrftoken.into(),
            expired: false,
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("token {}", self.token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub uuid: Uuid,
    pub name: String,
    pub unique_name: EntityName,
    pub owner: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Denormalized child summaries.
    #[serde(default)]
    pub groups: Vec<EntityName>,
    #[serde(default)]
    pub experiments: Vec<EntityName>,
    #[serde(default)]
    pub jobs: Vec<EntityName>,
    #[serde(default)]
    pub builds: Vec<EntityName>,
    #[serde(default)]
    pub num_groups: i64,
    #[serde(default)]
    pub num_experiments: i64,
    #[serde(default)]
    pub num_jobs: i64,
    #[serde(default)]
    pub num_builds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentGroup {
    pub uuid: Uuid,
    pub unique_name: EntityName,
    pub project: EntityName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub concurrency: Option<i32>,
    #[serde(default)]
    pub search_algorithm: Option<String>,
    #[serde(default)]
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub experiments: Vec<EntityName>,
    #[serde(default)]
    pub num_experiments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub uuid: Uuid,
    pub unique_name: EntityName,
    pub project: EntityName,
    /// Present only for experiments scheduled through a group.
    #[serde(default)]
    pub group: Option<EntityName>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub last_status: Option<RunStatus>,
    #[serde(default)]
    pub last_metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub jobs: Vec<EntityName>,
    #[serde(default)]
    pub num_jobs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub uuid: Uuid,
    pub unique_name: EntityName,
    pub project: EntityName,
    /// Present for jobs running under an experiment.
    #[serde(default)]
    pub experiment: Option<EntityName>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub last_status: Option<RunStatus>,
    #[serde(default)]
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub uuid: Uuid,
    pub unique_name: EntityName,
    pub project: EntityName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
    #[serde(default)]
    pub last_status: Option<RunStatus>,
    #[serde(default)]
    pub bookmarked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: EntityName,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub projects: Vec<EntityName>,
    #[serde(default)]
    pub num_projects: i64,
}

/// Envelope used only by bookmark-listing responses. Unwrapped into a plain
/// collection the moment it is received; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark<E> {
    pub content_object: E,
}

/// Server pagination envelope for list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedPayload<E> {
    pub results: Vec<E>,
    pub count: i64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_project_payload_decodes() {
        let payload = json!({
            "uuid": "550e8400-e29b-41d4-a716-446655440000",
            "name": "vision",
            "unique_name": "alice.vision",
            "owner": "alice",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        });

        let project: Project = serde_json::from_value(payload).unwrap();
        assert!(project.is_public);
        assert!(!project.bookmarked);
        assert!(project.groups.is_empty());
        assert_eq!(project.num_groups, 0);
    }

    #[test]
    fn bookmark_wrapper_is_transparent_around_content() {
        let payload = json!({
            "content_object": {
                "uuid": "550e8400-e29b-41d4-a716-446655440001",
                "unique_name": "alice.vision.3",
                "project": "alice.vision",
                "created_at": "2026-01-01T00:00:00Z",
                "updated_at": "2026-01-01T00:00:00Z"
            }
        });

        let wrapper: Bookmark<ExperimentGroup> = serde_json::from_value(payload).unwrap();
        assert_eq!(
            wrapper.content_object.unique_name,
            EntityName::new("alice.vision.3")
        );
    }

    #[test]
    fn paged_payload_tolerates_missing_links() {
        let payload = json!({ "results": [], "count": 42 });
        let page: PagedPayload<Project> = serde_json::from_value(payload).unwrap();
        assert_eq!(page.count, 42);
        assert!(page.next.is_none());
    }
}
