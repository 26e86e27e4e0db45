pub mod config;
pub mod entities;
pub mod types;

pub use config::Config;
pub use entities::{
    AuthState, Bookmark, Build, Experiment, ExperimentGroup, Job, PagedPayload, Project, User,
};
pub use types::{EntityName, ResourceKind, RunStatus};
