//! The closed event union dispatched into the pipeline.
//!
//! Every state change is one of these values — there is no other write path
//! to the snapshot. The outer enum routes to exactly one slice; the inner
//! [`SliceEvent`] carries the operation vocabulary shared by every resource
//! type. Slice stores and the synchronizer pattern-match exhaustively; no
//! catch-all arms.

use runboard_common::entities::{Bookmark, Build, Experiment, ExperimentGroup, Job, Project, User};
use runboard_common::types::{EntityName, ResourceKind, RunStatus};
use serde::{Deserialize, Serialize};

/// A state-change event, tagged with the resource slice it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Projects(SliceEvent<Project>),
    Groups(SliceEvent<ExperimentGroup>),
    Experiments(SliceEvent<Experiment>),
    Jobs(SliceEvent<Job>),
    Builds(SliceEvent<Build>),
    Users(SliceEvent<User>),
    /// An auth-class response (401/403) was observed by the boundary
    /// adapter. Dispatched instead of the completion event.
    AuthExpired { status: u16 },
}

impl Event {
    /// The slice this event targets, if any.
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Event::Projects(_) => Some(ResourceKind::Project),
            Event::Groups(_) => Some(ResourceKind::Group),
            Event::Experiments(_) => Some(ResourceKind::Experiment),
            Event::Jobs(_) => Some(ResourceKind::Job),
            Event::Builds(_) => Some(ResourceKind::Build),
            Event::Users(_) => Some(ResourceKind::User),
            Event::AuthExpired { .. } => None,
        }
    }
}

/// Per-slice operations. One vocabulary serves every resource type; slices
/// that have no lifecycle (projects, users) simply never see `Stopped` or
/// `StatusChanged` from the adapter, and treat them as no-ops if they do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceEvent<E> {
    /// A list fetch went out; mark the collection as loading.
    FetchRequested,
    /// A list page arrived; replaces the collection wholesale.
    PageReceived { results: Vec<E>, count: i64 },
    /// A bookmark-listing page arrived; wrappers are unwrapped on receipt.
    BookmarksReceived {
        results: Vec<Bookmark<E>>,
        count: i64,
    },
    /// A single entity arrived from a detail fetch.
    OneReceived { entity: E },
    Created { entity: E },
    Updated { entity: E },
    Deleted { name: EntityName },
    Stopped { name: EntityName },
    StatusChanged { name: EntityName, status: RunStatus },
    Bookmarked { name: EntityName },
    Unbookmarked { name: EntityName },
}

impl<E> SliceEvent<E> {
    /// Stable operation label, for logging.
    pub fn op(&self) -> &'static str {
        match self {
            SliceEvent::FetchRequested => "fetch_requested",
            SliceEvent::PageReceived { .. } => "page_received",
            SliceEvent::BookmarksReceived { .. } => "bookmarks_received",
            SliceEvent::OneReceived { .. } => "one_received",
            SliceEvent::Created { .. } => "created",
            SliceEvent::Updated { .. } => "updated",
            SliceEvent::Deleted { .. } => "deleted",
            SliceEvent::Stopped { .. } => "stopped",
            SliceEvent::StatusChanged { .. } => "status_changed",
            SliceEvent::Bookmarked { .. } => "bookmarked",
            SliceEvent::Unbookmarked { .. } => "unbookmarked",
        }
    }
}
