//! The seam between generic slice mechanics and concrete entity types.

use runboard_common::entities::{Build, Experiment, ExperimentGroup, Job, Project, User};
use runboard_common::types::{EntityName, ResourceKind, RunStatus};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::events::{Event, SliceEvent};

/// A resource type held by one slice of the snapshot.
///
/// Flag setters default to no-ops so resources without a bookmark flag or a
/// lifecycle (users, projects) stay total under every slice event.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn name(&self) -> &EntityName;

    fn bookmarked(&self) -> bool {
        false
    }

    fn set_bookmarked(&mut self, flag: bool) {
        let _ = flag;
    }

    fn set_status(&mut self, status: RunStatus) {
        let _ = status;
    }

    /// Lift a slice event into the closed union, tagged for this resource.
    fn into_event(event: SliceEvent<Self>) -> Event;
}

impl Resource for Project {
    const KIND: ResourceKind = ResourceKind::Project;

    fn name(&self) -> &EntityName {
        &self.unique_name
    }

    fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, flag: bool) {
        self.bookmarked = flag;
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Projects(event)
    }
}

impl Resource for ExperimentGroup {
    const KIND: ResourceKind = ResourceKind::Group;

    fn name(&self) -> &EntityName {
        &self.unique_name
    }

    fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, flag: bool) {
        self.bookmarked = flag;
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Groups(event)
    }
}

impl Resource for Experiment {
    const KIND: ResourceKind = ResourceKind::Experiment;

    fn name(&self) -> &EntityName {
        &self.unique_name
    }

    fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, flag: bool) {
        self.bookmarked = flag;
    }

    fn set_status(&mut self, status: RunStatus) {
        self.last_status = Some(status);
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Experiments(event)
    }
}

impl Resource for Job {
    const KIND: ResourceKind = ResourceKind::Job;

    fn name(&self) -> &EntityName {
        &self.unique_name
    }

    fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, flag: bool) {
        self.bookmarked = flag;
    }

    fn set_status(&mut self, status: RunStatus) {
        self.last_status = Some(status);
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Jobs(event)
    }
}

impl Resource for Build {
    const KIND: ResourceKind = ResourceKind::Build;

    fn name(&self) -> &EntityName {
        &self.unique_name
    }

    fn bookmarked(&self) -> bool {
        self.bookmarked
    }

    fn set_bookmarked(&mut self, flag: bool) {
        self.bookmarked = flag;
    }

    fn set_status(&mut self, status: RunStatus) {
        self.last_status = Some(status);
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Builds(event)
    }
}

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;

    fn name(&self) -> &EntityName {
        &self.username
    }

    fn into_event(event: SliceEvent<Self>) -> Event {
        Event::Users(event)
    }
}
