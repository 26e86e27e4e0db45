//! Operator CLI: fetch a user's dashboard collections, run them through the
//! state pipeline, and print a per-slice summary.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use runboard_client::{Dispatch, Filters, NullNavigator, RunboardClient};
use runboard_common::types::EntityName;
use runboard_common::Config;
use runboard_state::events::Event;
use runboard_state::Snapshot;

/// Dispatch sink that owns the snapshot behind a mutex and runs every event
/// through the two-phase pipeline.
struct SnapshotSink(Arc<Mutex<Snapshot>>);

impl Dispatch for SnapshotSink {
    fn dispatch(&self, event: Event) {
        let mut guard = self.0.lock().expect("snapshot lock poisoned");
        let prior = std::mem::take(&mut *guard);
        *guard = prior.apply(&event);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: runboard <username>"))?;

    let config = Config::from_env();
    let auth = config.auth();

    let snapshot = Arc::new(Mutex::new(Snapshot::default()));
    let client = RunboardClient::new(
        &config.api_host,
        SnapshotSink(Arc::clone(&snapshot)),
        NullNavigator,
    );

    info!(username, "Fetching dashboard state");
    client.fetch_user(&auth, &username).await?;
    client
        .fetch_projects(&auth, &username, &Filters::new(), None)
        .await?;

    let project_names: Vec<EntityName> = {
        let guard = snapshot.lock().expect("snapshot lock poisoned");
        guard
            .projects
            .items
            .iter()
            .map(|p| p.unique_name.clone())
            .collect()
    };

    for project in &project_names {
        client
            .fetch_groups(&auth, project, &Filters::new(), None)
            .await?;
        client
            .fetch_experiments(&auth, project, &Filters::new(), None)
            .await?;
        client
            .fetch_jobs(&auth, project, &Filters::new(), None)
            .await?;
        client
            .fetch_builds(&auth, project, &Filters::new(), None)
            .await?;
    }

    let guard = snapshot.lock().expect("snapshot lock poisoned");
    if guard.auth.expired {
        return Err(anyhow!("session expired — refresh your API token"));
    }

    println!("{username}");
    println!(
        "  projects     {:>5} loaded / {:>5} total",
        guard.projects.items.len(),
        guard.projects.count
    );
    println!(
        "  groups       {:>5} loaded / {:>5} total",
        guard.groups.items.len(),
        guard.groups.count
    );
    println!(
        "  experiments  {:>5} loaded / {:>5} total",
        guard.experiments.items.len(),
        guard.experiments.count
    );
    println!(
        "  jobs         {:>5} loaded / {:>5} total",
        guard.jobs.items.len(),
        guard.jobs.count
    );
    println!(
        "  builds       {:>5} loaded / {:>5} total",
        guard.builds.items.len(),
        guard.builds.count
    );

    for project in guard.projects.items.iter() {
        println!(
            "  {} — {} groups, {} experiments, {} jobs, {} builds",
            project.unique_name,
            project.num_groups,
            project.num_experiments,
            project.num_jobs,
            project.num_builds
        );
    }

    Ok(())
}
