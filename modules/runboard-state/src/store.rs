//! Slice store — one independent collection per resource type.
//!
//! Each event is either applied or a no-op; the reducer never errors and
//! never suspends. Invariant: `items` holds no duplicate identifiers.

use runboard_common::types::{EntityName, RunStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::SliceEvent;
use crate::resource::Resource;

/// An identifier-deduplicated list plus the server-reported total count.
/// `count` may exceed `items.len()` under pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<E> {
    pub items: Vec<E>,
    pub count: i64,
    pub loading: bool,
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            loading: false,
        }
    }
}

impl<E: Resource> Collection<E> {
    pub fn get(&self, name: &EntityName) -> Option<&E> {
        self.items.iter().find(|e| e.name() == name)
    }

    pub fn get_mut(&mut self, name: &EntityName) -> Option<&mut E> {
        self.items.iter_mut().find(|e| e.name() == name)
    }

    pub fn contains(&self, name: &EntityName) -> bool {
        self.get(name).is_some()
    }

    fn position(&self, name: &EntityName) -> Option<usize> {
        self.items.iter().position(|e| e.name() == name)
    }

    /// Reduce one event into this collection.
    pub fn apply(&mut self, event: &SliceEvent<E>) {
        match event {
            SliceEvent::FetchRequested => {
                self.loading = true;
            }
            SliceEvent::PageReceived { results, count } => {
                self.replace_all(results.clone(), *count);
            }
            SliceEvent::BookmarksReceived { results, count } => {
                let unwrapped = results.iter().map(|b| b.content_object.clone()).collect();
                self.replace_all(unwrapped, *count);
            }
            SliceEvent::OneReceived { entity } | SliceEvent::Created { entity } => {
                self.upsert(entity.clone());
            }
            SliceEvent::Updated { entity } => {
                match self.position(entity.name()) {
                    Some(i) => self.items[i] = entity.clone(),
                    None => {
                        debug!(kind = %E::KIND, name = %entity.name(), "Update for unknown entity, skipping");
                    }
                }
            }
            SliceEvent::Deleted { name } => {
                if let Some(i) = self.position(name) {
                    self.items.remove(i);
                    self.count -= 1;
                }
            }
            SliceEvent::Stopped { name } => {
                self.with_item(name, |e| e.set_status(RunStatus::Stopped));
            }
            SliceEvent::StatusChanged { name, status } => {
                self.with_item(name, |e| e.set_status(*status));
            }
            SliceEvent::Bookmarked { name } => {
                self.with_item(name, |e| e.set_bookmarked(true));
            }
            SliceEvent::Unbookmarked { name } => {
                self.with_item(name, |e| e.set_bookmarked(false));
            }
        }
    }

    /// Wholesale replacement from a list page. Dedup keeps the first
    /// occurrence of each identifier.
    fn replace_all(&mut self, results: Vec<E>, count: i64) {
        self.items.clear();
        for entity in results {
            if !self.contains(entity.name()) {
                self.items.push(entity);
            }
        }
        self.count = count;
        self.loading = false;
    }

    /// Replace in place if present, else prepend. A prepend also bumps
    /// `count`: the collection learned of an entity it had not counted.
    fn upsert(&mut self, entity: E) {
        match self.position(entity.name()) {
            Some(i) => self.items[i] = entity,
            None => {
                self.items.insert(0, entity);
                self.count += 1;
            }
        }
    }

    fn with_item(&mut self, name: &EntityName, mutate: impl FnOnce(&mut E)) {
        match self.get_mut(name) {
            Some(entity) => mutate(entity),
            None => {
                debug!(kind = %E::KIND, name = %name, "Flag change for unknown entity, skipping");
            }
        }
    }
}
