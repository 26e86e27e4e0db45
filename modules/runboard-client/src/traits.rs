//! Collaborator seams for the boundary adapter.

use runboard_state::events::Event;

/// Sink for state-change events. Synchronous and infallible — the host owns
/// delivery to whatever holds the snapshot.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, event: Event);
}

/// Navigation history collaborator. Invoked only by list fetches, per the
/// filter/history coupling.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

/// Navigator that drops every push. For hosts without a location bar.
pub struct NullNavigator;

impl Navigator for NullNavigator {
    fn push(&self, _path: &str) {}
}
