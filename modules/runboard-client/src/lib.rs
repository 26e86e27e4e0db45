//! Boundary adapter between the dashboard REST API and the state pipeline.
//!
//! Each resource operation issues exactly one request and dispatches its
//! completion event into the [`Dispatch`] sink. List fetches additionally
//! dispatch a `FetchRequested` event up front and couple their filter map to
//! navigation history. Auth-class responses (401/403) short-circuit: an
//! `AuthExpired` event is dispatched and the completion event never fires.
//! Other failures propagate to the caller as [`ClientError`].
//!
//! There is no request-generation guard: a superseded in-flight request's
//! completion still dispatches, and the snapshot resolves by arrival order.

pub mod error;
pub mod filters;
pub mod testutil;
pub mod traits;

pub use error::{ClientError, Result};
pub use filters::{history_push, FilterValue, Filters};
pub use traits::{Dispatch, Navigator, NullNavigator};

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::{debug, info};

use runboard_common::entities::{
    AuthState, Build, Experiment, ExperimentGroup, Job, PagedPayload, Project, User,
};
use runboard_common::types::EntityName;
use runboard_state::events::{Event, SliceEvent};
use runboard_state::resource::Resource;

const CSRF_HEADER: &str = "X-CSRFToken";

/// Statuses routed to the auth-error handler instead of the caller.
fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

pub struct RunboardClient<D: Dispatch, N: Navigator> {
    http: reqwest::Client,
    base_url: String,
    dispatch: D,
    nav: N,
}

impl<D: Dispatch, N: Navigator> RunboardClient<D, N> {
    pub fn new(base_url: &str, dispatch: D, nav: N) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            dispatch,
            nav,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// Route a response: auth-class → dispatch `AuthExpired` and swallow
    /// (`None` short-circuits the completion chain); other non-2xx → typed
    /// error; 2xx → pass the response through.
    async fn check(&self, resp: reqwest::Response) -> Result<Option<reqwest::Response>> {
        let status = resp.status().as_u16();
        if is_auth_failure(status) {
            info!(status, "Auth-class response, aborting completion chain");
            self.dispatch.dispatch(Event::AuthExpired { status });
            return Ok(None);
        }
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, message });
        }
        Ok(Some(resp))
    }

    // -----------------------------------------------------------------------
    // Generic operations
    // -----------------------------------------------------------------------

    async fn fetch_list<E: Resource>(
        &self,
        auth: &AuthState,
        path: &str,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        self.dispatch
            .dispatch(E::into_event(SliceEvent::FetchRequested));

        let query = filters.to_query_string();
        if let Some(target) = history_push(path, &query, current_query) {
            self.nav.push(&target);
        }

        let mut url = self.api_url(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        debug!(kind = %E::KIND, url = %url, "Fetching list");
        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth.authorization())
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let page: PagedPayload<E> = resp.json().await?;
        self.dispatch.dispatch(E::into_event(SliceEvent::PageReceived {
            results: page.results,
            count: page.count,
        }));
        Ok(())
    }

    async fn fetch_bookmarks<E: Resource>(&self, auth: &AuthState, username: &str) -> Result<()> {
        self.dispatch
            .dispatch(E::into_event(SliceEvent::FetchRequested));

        let url = self.api_url(&format!("bookmarks/{}/{}", username, E::KIND.url_segment()));
        debug!(kind = %E::KIND, url = %url, "Fetching bookmarks");
        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth.authorization())
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let page: PagedPayload<runboard_common::entities::Bookmark<E>> = resp.json().await?;
        self.dispatch
            .dispatch(E::into_event(SliceEvent::BookmarksReceived {
                results: page.results,
                count: page.count,
            }));
        Ok(())
    }

    async fn fetch_one<E: Resource>(&self, auth: &AuthState, path: &str) -> Result<()> {
        let url = self.api_url(path);
        debug!(kind = %E::KIND, url = %url, "Fetching entity");
        let resp = self
            .http
            .get(&url)
            .header(AUTHORIZATION, auth.authorization())
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let entity: E = resp.json().await?;
        self.dispatch
            .dispatch(E::into_event(SliceEvent::OneReceived { entity }));
        Ok(())
    }

    /// POST a payload; the decoded response is the created entity.
    async fn create_entity<E: Resource, S: Serialize>(
        &self,
        auth: &AuthState,
        path: &str,
        payload: &S,
    ) -> Result<()> {
        let url = self.api_url(path);
        info!(kind = %E::KIND, url = %url, "Creating entity");
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let entity: E = resp.json().await?;
        self.dispatch
            .dispatch(E::into_event(SliceEvent::Created { entity }));
        Ok(())
    }

    /// PATCH a payload; the decoded response is the updated entity.
    async fn update_entity<E: Resource, S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        let url = self.api_url(&name.url_path());
        info!(kind = %E::KIND, url = %url, "Updating entity");
        let resp = self
            .http
            .patch(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let entity: E = resp.json().await?;
        self.dispatch
            .dispatch(E::into_event(SliceEvent::Updated { entity }));
        Ok(())
    }

    async fn delete_entity<E: Resource>(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let url = self.api_url(&name.url_path());
        info!(kind = %E::KIND, url = %url, "Deleting entity");
        let resp = self
            .http
            .delete(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        if self.check(resp).await?.is_none() {
            return Ok(());
        }

        self.dispatch.dispatch(E::into_event(SliceEvent::Deleted {
            name: name.clone(),
        }));
        Ok(())
    }

    /// POST to a sub-path (`stop`, `bookmark`); on success dispatch the
    /// given marker event. No response body expected.
    async fn post_marker<E: Resource>(
        &self,
        auth: &AuthState,
        path: &str,
        event: SliceEvent<E>,
    ) -> Result<()> {
        let url = self.api_url(path);
        info!(kind = %E::KIND, url = %url, op = event.op(), "Posting marker");
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        if self.check(resp).await?.is_none() {
            return Ok(());
        }

        self.dispatch.dispatch(E::into_event(event));
        Ok(())
    }

    /// DELETE on a sub-path (`unbookmark`); on success dispatch the marker.
    async fn delete_marker<E: Resource>(
        &self,
        auth: &AuthState,
        path: &str,
        event: SliceEvent<E>,
    ) -> Result<()> {
        let url = self.api_url(path);
        info!(kind = %E::KIND, url = %url, op = event.op(), "Deleting marker");
        let resp = self
            .http
            .delete(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        if self.check(resp).await?.is_none() {
            return Ok(());
        }

        self.dispatch.dispatch(E::into_event(event));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn fetch_projects(
        &self,
        auth: &AuthState,
        username: &str,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        self.fetch_list::<Project>(auth, username, filters, current_query)
            .await
    }

    pub async fn fetch_project(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.fetch_one::<Project>(auth, &name.url_path()).await
    }

    pub async fn create_project<S: Serialize>(&self, auth: &AuthState, payload: &S) -> Result<()> {
        self.create_entity::<Project, S>(auth, "projects", payload)
            .await
    }

    pub async fn update_project<S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        self.update_entity::<Project, S>(auth, name, payload).await
    }

    pub async fn delete_project(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.delete_entity::<Project>(auth, name).await
    }

    pub async fn bookmark_project(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/bookmark", name.url_path());
        self.post_marker::<Project>(auth, &path, SliceEvent::Bookmarked { name: name.clone() })
            .await
    }

    pub async fn unbookmark_project(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/unbookmark", name.url_path());
        self.delete_marker::<Project>(auth, &path, SliceEvent::Unbookmarked { name: name.clone() })
            .await
    }

    pub async fn fetch_bookmarked_projects(&self, auth: &AuthState, username: &str) -> Result<()> {
        self.fetch_bookmarks::<Project>(auth, username).await
    }

    // -----------------------------------------------------------------------
    // Experiment groups
    // -----------------------------------------------------------------------

    pub async fn fetch_groups(
        &self,
        auth: &AuthState,
        project: &EntityName,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        let path = format!("{}/groups", project.url_path());
        self.fetch_list::<ExperimentGroup>(auth, &path, filters, current_query)
            .await
    }

    pub async fn fetch_group(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.fetch_one::<ExperimentGroup>(auth, &name.url_path())
            .await
    }

    pub async fn create_group<S: Serialize>(
        &self,
        auth: &AuthState,
        project: &EntityName,
        payload: &S,
    ) -> Result<()> {
        let path = format!("{}/groups", project.url_path());
        self.create_entity::<ExperimentGroup, S>(auth, &path, payload)
            .await
    }

    pub async fn update_group<S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        self.update_entity::<ExperimentGroup, S>(auth, name, payload)
            .await
    }

    pub async fn delete_group(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.delete_entity::<ExperimentGroup>(auth, name).await
    }

    pub async fn bookmark_group(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/bookmark", name.url_path());
        self.post_marker::<ExperimentGroup>(
            auth,
            &path,
            SliceEvent::Bookmarked { name: name.clone() },
        )
        .await
    }

    pub async fn unbookmark_group(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/unbookmark", name.url_path());
        self.delete_marker::<ExperimentGroup>(
            auth,
            &path,
            SliceEvent::Unbookmarked { name: name.clone() },
        )
        .await
    }

    pub async fn fetch_bookmarked_groups(&self, auth: &AuthState, username: &str) -> Result<()> {
        self.fetch_bookmarks::<ExperimentGroup>(auth, username).await
    }

    // -----------------------------------------------------------------------
    // Experiments
    // -----------------------------------------------------------------------

    pub async fn fetch_experiments(
        &self,
        auth: &AuthState,
        project: &EntityName,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        let path = format!("{}/experiments", project.url_path());
        self.fetch_list::<Experiment>(auth, &path, filters, current_query)
            .await
    }

    pub async fn fetch_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.fetch_one::<Experiment>(auth, &name.url_path()).await
    }

    pub async fn create_experiment<S: Serialize>(
        &self,
        auth: &AuthState,
        project: &EntityName,
        payload: &S,
    ) -> Result<()> {
        let path = format!("{}/experiments", project.url_path());
        self.create_entity::<Experiment, S>(auth, &path, payload)
            .await
    }

    pub async fn update_experiment<S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        self.update_entity::<Experiment, S>(auth, name, payload)
            .await
    }

    pub async fn delete_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.delete_entity::<Experiment>(auth, name).await
    }

    pub async fn stop_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/stop", name.url_path());
        self.post_marker::<Experiment>(auth, &path, SliceEvent::Stopped { name: name.clone() })
            .await
    }

    /// Restart returns a fresh experiment payload; it enters the collection
    /// as a new entity at the head.
    pub async fn restart_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/restart", name.url_path());
        let url = self.api_url(&path);
        info!(url = %url, "Restarting experiment");
        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth.authorization())
            .header(CSRF_HEADER, &auth.csrftoken)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let Some(resp) = self.check(resp).await? else {
            return Ok(());
        };

        let entity: Experiment = resp.json().await?;
        self.dispatch
            .dispatch(Experiment::into_event(SliceEvent::Created { entity }));
        Ok(())
    }

    pub async fn bookmark_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/bookmark", name.url_path());
        self.post_marker::<Experiment>(auth, &path, SliceEvent::Bookmarked { name: name.clone() })
            .await
    }

    pub async fn unbookmark_experiment(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/unbookmark", name.url_path());
        self.delete_marker::<Experiment>(
            auth,
            &path,
            SliceEvent::Unbookmarked { name: name.clone() },
        )
        .await
    }

    pub async fn fetch_bookmarked_experiments(
        &self,
        auth: &AuthState,
        username: &str,
    ) -> Result<()> {
        self.fetch_bookmarks::<Experiment>(auth, username).await
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    pub async fn fetch_jobs(
        &self,
        auth: &AuthState,
        project: &EntityName,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        let path = format!("{}/jobs", project.url_path());
        self.fetch_list::<Job>(auth, &path, filters, current_query)
            .await
    }

    pub async fn fetch_job(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.fetch_one::<Job>(auth, &name.url_path()).await
    }

    pub async fn create_job<S: Serialize>(
        &self,
        auth: &AuthState,
        project: &EntityName,
        payload: &S,
    ) -> Result<()> {
        let path = format!("{}/jobs", project.url_path());
        self.create_entity::<Job, S>(auth, &path, payload).await
    }

    pub async fn update_job<S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        self.update_entity::<Job, S>(auth, name, payload).await
    }

    pub async fn delete_job(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.delete_entity::<Job>(auth, name).await
    }

    pub async fn stop_job(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/stop", name.url_path());
        self.post_marker::<Job>(auth, &path, SliceEvent::Stopped { name: name.clone() })
            .await
    }

    pub async fn bookmark_job(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/bookmark", name.url_path());
        self.post_marker::<Job>(auth, &path, SliceEvent::Bookmarked { name: name.clone() })
            .await
    }

    pub async fn unbookmark_job(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/unbookmark", name.url_path());
        self.delete_marker::<Job>(auth, &path, SliceEvent::Unbookmarked { name: name.clone() })
            .await
    }

    pub async fn fetch_bookmarked_jobs(&self, auth: &AuthState, username: &str) -> Result<()> {
        self.fetch_bookmarks::<Job>(auth, username).await
    }

    // -----------------------------------------------------------------------
    // Builds
    // -----------------------------------------------------------------------

    pub async fn fetch_builds(
        &self,
        auth: &AuthState,
        project: &EntityName,
        filters: &Filters,
        current_query: Option<&str>,
    ) -> Result<()> {
        let path = format!("{}/builds", project.url_path());
        self.fetch_list::<Build>(auth, &path, filters, current_query)
            .await
    }

    pub async fn fetch_build(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.fetch_one::<Build>(auth, &name.url_path()).await
    }

    pub async fn create_build<S: Serialize>(
        &self,
        auth: &AuthState,
        project: &EntityName,
        payload: &S,
    ) -> Result<()> {
        let path = format!("{}/builds", project.url_path());
        self.create_entity::<Build, S>(auth, &path, payload).await
    }

    pub async fn update_build<S: Serialize>(
        &self,
        auth: &AuthState,
        name: &EntityName,
        payload: &S,
    ) -> Result<()> {
        self.update_entity::<Build, S>(auth, name, payload).await
    }

    pub async fn delete_build(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        self.delete_entity::<Build>(auth, name).await
    }

    pub async fn stop_build(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/stop", name.url_path());
        self.post_marker::<Build>(auth, &path, SliceEvent::Stopped { name: name.clone() })
            .await
    }

    pub async fn bookmark_build(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/bookmark", name.url_path());
        self.post_marker::<Build>(auth, &path, SliceEvent::Bookmarked { name: name.clone() })
            .await
    }

    pub async fn unbookmark_build(&self, auth: &AuthState, name: &EntityName) -> Result<()> {
        let path = format!("{}/unbookmark", name.url_path());
        self.delete_marker::<Build>(auth, &path, SliceEvent::Unbookmarked { name: name.clone() })
            .await
    }

    pub async fn fetch_bookmarked_builds(&self, auth: &AuthState, username: &str) -> Result<()> {
        self.fetch_bookmarks::<Build>(auth, username).await
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn fetch_user(&self, auth: &AuthState, username: &str) -> Result<()> {
        let path = format!("users/{username}");
        self.fetch_one::<User>(auth, &path).await
    }
}
