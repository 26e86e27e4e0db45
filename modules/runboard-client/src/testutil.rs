//! Test support: capture fakes for the collaborator seams.

use std::sync::Mutex;

use runboard_state::events::Event;

use crate::traits::{Dispatch, Navigator};

/// Dispatch sink that records every event in order.
#[derive(Default)]
pub struct MemoryDispatch {
    events: Mutex<Vec<Event>>,
}

impl MemoryDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("dispatch log poisoned").clone()
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().expect("dispatch log poisoned"))
    }
}

impl Dispatch for MemoryDispatch {
    fn dispatch(&self, event: Event) {
        self.events.lock().expect("dispatch log poisoned").push(event);
    }
}

impl Dispatch for &MemoryDispatch {
    fn dispatch(&self, event: Event) {
        (*self).dispatch(event);
    }
}

/// Navigator that records every pushed path.
#[derive(Default)]
pub struct MemoryNavigator {
    paths: Mutex<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().expect("navigator log poisoned").clone()
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str) {
        self.paths
            .lock()
            .expect("navigator log poisoned")
            .push(path.to_string());
    }
}

impl Navigator for &MemoryNavigator {
    fn push(&self, path: &str) {
        (*self).push(path);
    }
}
