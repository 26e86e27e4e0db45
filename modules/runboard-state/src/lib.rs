//! Core state pipeline for the dashboard.
//!
//! Every dispatched event flows through two synchronous passes:
//! per-resource slice stores reduce it independently, then the
//! cross-reference synchronizer repairs denormalized fields that span
//! resource boundaries. Both passes are total — no event can fail them.

pub mod events;
pub mod resource;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use events::{Event, SliceEvent};
pub use resource::Resource;
pub use snapshot::Snapshot;
pub use store::Collection;
pub use sync::RepairStage;
