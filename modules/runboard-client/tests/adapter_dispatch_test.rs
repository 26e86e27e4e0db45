//! Adapter dispatch-ordering tests.
//!
//! These verify the boundary adapter's observable contract without a live
//! server: the request-started event and the history push both happen before
//! the transport is touched, and transport failures surface as errors rather
//! than dispatched events. The base URL points at a closed local port so
//! every send fails fast with a connection error.

use runboard_client::testutil::{MemoryDispatch, MemoryNavigator};
use runboard_client::{ClientError, Filters, RunboardClient};
use runboard_common::entities::AuthState;
use runboard_common::types::EntityName;
use runboard_state::events::{Event, SliceEvent};

const DEAD_HOST: &str = "http://127.0.0.1:1";

fn auth() -> AuthState {
    AuthState::new("secret-token", "csrf-secret")
}

#[tokio::test]
async fn list_fetch_dispatches_request_started_before_transport() {
    let dispatch = MemoryDispatch::new();
    let nav = MemoryNavigator::new();
    let client = RunboardClient::new(DEAD_HOST, &dispatch, &nav);

    let result = client
        .fetch_experiments(
            &auth(),
            &EntityName::new("alice.vision"),
            &Filters::new(),
            None,
        )
        .await;

    assert!(matches!(result, Err(ClientError::Network(_))));

    let events = dispatch.take();
    assert_eq!(events.len(), 1, "only the request-started event may fire");
    assert!(matches!(
        events[0],
        Event::Experiments(SliceEvent::FetchRequested)
    ));
}

#[tokio::test]
async fn list_fetch_pushes_filtered_path_into_history() {
    let dispatch = MemoryDispatch::new();
    let nav = MemoryNavigator::new();
    let client = RunboardClient::new(DEAD_HOST, &dispatch, &nav);

    let filters = Filters::new().with("independent", true);
    let _ = client
        .fetch_experiments(&auth(), &EntityName::new("alice.vision"), &filters, None)
        .await;

    assert_eq!(
        nav.paths(),
        vec!["alice/vision/experiments?independent=true".to_string()]
    );
}

#[tokio::test]
async fn list_fetch_resets_history_when_filters_cleared() {
    let dispatch = MemoryDispatch::new();
    let nav = MemoryNavigator::new();
    let client = RunboardClient::new(DEAD_HOST, &dispatch, &nav);

    let _ = client
        .fetch_jobs(
            &auth(),
            &EntityName::new("alice.vision"),
            &Filters::new(),
            Some("limit=20"),
        )
        .await;

    assert_eq!(nav.paths(), vec!["alice/vision/jobs".to_string()]);
}

#[tokio::test]
async fn list_fetch_leaves_history_alone_when_nothing_changed() {
    let dispatch = MemoryDispatch::new();
    let nav = MemoryNavigator::new();
    let client = RunboardClient::new(DEAD_HOST, &dispatch, &nav);

    let _ = client
        .fetch_builds(
            &auth(),
            &EntityName::new("alice.vision"),
            &Filters::new(),
            None,
        )
        .await;

    assert!(nav.paths().is_empty());
}

#[tokio::test]
async fn mutations_dispatch_nothing_on_transport_failure() {
    let dispatch = MemoryDispatch::new();
    let nav = MemoryNavigator::new();
    let client = RunboardClient::new(DEAD_HOST, &dispatch, &nav);

    let name = EntityName::new("alice.vision.3");
    let delete = client.delete_group(&auth(), &name).await;
    let stop = client
        .stop_experiment(&auth(), &EntityName::new("alice.vision.8"))
        .await;

    assert!(delete.is_err());
    assert!(stop.is_err());
    assert!(
        dispatch.events().is_empty(),
        "completion events must not fire without a successful response"
    );
}
