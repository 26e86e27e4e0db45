//! The full dashboard snapshot and the two-phase pipeline driver.

use runboard_common::entities::{
    AuthState, Build, Experiment, ExperimentGroup, Job, Project, User,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::events::Event;
use crate::store::Collection;
use crate::sync;

/// The whole client-side state. Callers own its lifetime; there is no
/// hidden singleton. `apply` is the only write path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub projects: Collection<Project>,
    pub groups: Collection<ExperimentGroup>,
    pub experiments: Collection<Experiment>,
    pub jobs: Collection<Job>,
    pub builds: Collection<Build>,
    pub users: Collection<User>,
    pub auth: AuthState,
}

impl Snapshot {
    /// Run one event through both passes: slice reduction, then
    /// cross-reference repair. Total — never fails, never suspends.
    pub fn apply(mut self, event: &Event) -> Snapshot {
        self.reduce(event);
        sync::repair(&mut self, event);
        self
    }

    /// Phase 1: route the event to exactly one slice.
    fn reduce(&mut self, event: &Event) {
        match event {
            Event::Projects(ev) => self.projects.apply(ev),
            Event::Groups(ev) => self.groups.apply(ev),
            Event::Experiments(ev) => self.experiments.apply(ev),
            Event::Jobs(ev) => self.jobs.apply(ev),
            Event::Builds(ev) => self.builds.apply(ev),
            Event::Users(ev) => self.users.apply(ev),
            Event::AuthExpired { status } => {
                warn!(status = *status, "Auth-class response observed, marking session expired");
                self.auth.expired = true;
            }
        }
    }
}
