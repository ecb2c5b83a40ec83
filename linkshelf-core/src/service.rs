use crate::draft::{DraftTarget, LinkDraft, is_web_url, validate_url};
use crate::store::{LinkStore, MessageKind};
use linkshelf_api::{ApiClient, ApiError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

pub const FETCH_ERROR_MESSAGE: &str = "Connection error or failure while fetching data.";
const CONNECTION_ERROR_TEXT: &str = "could not reach the server";

/// Result of a service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Preconditions not met; no request was issued
    Skipped,
    Succeeded,
    /// The failure has already been reported (message or log)
    Failed,
}

impl Outcome {
    /// Whether the local collection must be refetched after this mutation.
    pub fn needs_resync(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// Prompt shown before a link is deleted.
pub fn delete_prompt(label: &str) -> String {
    format!("Are you sure you want to delete the link: \"{}\"?", label)
}

/// Text shown to the user for a failed request.
pub fn user_error_text(err: &ApiError, fallback: &str) -> String {
    if let Some(message) = err.server_message() {
        message.to_string()
    } else if err.is_connection() {
        CONNECTION_ERROR_TEXT.to_string()
    } else {
        fallback.to_string()
    }
}

/// Runs the API calls and keeps the shared `LinkStore` in step with them.
///
/// Mutations (`create`, `update`, `remove`) do not refresh on their own; pass
/// their outcome to `resync` to refetch the collection.
pub struct LinkService {
    api: ApiClient,
    store: Arc<Mutex<LinkStore>>,
}

impl LinkService {
    pub fn new(api: ApiClient) -> Self {
        Self::with_store(api, Arc::new(Mutex::new(LinkStore::new())))
    }

    pub fn with_store(api: ApiClient, store: Arc<Mutex<LinkStore>>) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Lock the store. The guard must not be held across an await.
    pub fn lock(&self) -> MutexGuard<'_, LinkStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update_store<R>(&self, f: impl FnOnce(&mut LinkStore) -> R) -> R {
        f(&mut self.lock())
    }

    fn pending(&self) -> Pending<'_> {
        self.lock().begin_request();
        Pending {
            store: &self.store,
            analysis: false,
        }
    }

    fn analyzing(&self) -> Pending<'_> {
        self.lock().begin_analysis();
        Pending {
            store: &self.store,
            analysis: true,
        }
    }

    fn report(&self, text: String, kind: MessageKind) {
        self.lock().show_message(text, kind);
    }

    /// Fetch the collection, then the stats. A stats failure is not fatal.
    pub async fn fetch_all(&self) -> Outcome {
        let seq = self.lock().begin_fetch();
        let _pending = self.pending();

        match self.api.list_links().await {
            Ok(links) => {
                debug!("Fetched {} links (fetch #{})", links.len(), seq);
                if !self.lock().apply_links(seq, links) {
                    debug!("Discarding links from superseded fetch #{}", seq);
                }
            }
            Err(e) => {
                error!("Failed to fetch links: {}", e);
                self.report(FETCH_ERROR_MESSAGE.to_string(), MessageKind::Error);
                return Outcome::Failed;
            }
        }

        match self.api.list_stats().await {
            Ok(stats) => {
                self.lock().apply_stats(seq, stats);
            }
            Err(e) => warn!("Could not load statistics: {}", e),
        }

        Outcome::Succeeded
    }

    /// Create a link from `draft`. On success the form is reset.
    pub async fn create(&self, draft: LinkDraft) -> Outcome {
        if draft.url.trim().is_empty() {
            return Outcome::Skipped;
        }
        if let Err(reason) = validate_url(&draft.url) {
            self.report(format!("Error creating: {}", reason), MessageKind::Error);
            return Outcome::Failed;
        }

        let payload = draft.payload();
        let _pending = self.pending();

        match self.api.create_link(&payload).await {
            Ok(created) => {
                let title = created
                    .title_used
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| draft.display_title().to_string());
                info!("Created link {} ({})", payload.url, title);
                let mut store = self.lock();
                store.show_message(
                    format!("Link '{}' created successfully.", title),
                    MessageKind::Success,
                );
                store.reset_form();
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Create failed for {}: {}", payload.url, e);
                self.report(
                    format!(
                        "Error creating: {}",
                        user_error_text(&e, "failed to create the link")
                    ),
                    MessageKind::Error,
                );
                Outcome::Failed
            }
        }
    }

    /// Save an edited link. Drafts without an id are ignored.
    pub async fn update(&self, draft: LinkDraft) -> Outcome {
        let Some(id) = draft.link_id() else {
            return Outcome::Skipped;
        };
        if let Err(reason) = validate_url(&draft.url) {
            self.report(format!("Error updating: {}", reason), MessageKind::Error);
            return Outcome::Failed;
        }

        let payload = draft.payload();
        let _pending = self.pending();

        match self.api.update_link(id, &payload).await {
            Ok(()) => {
                info!("Updated link {}", id);
                let mut store = self.lock();
                store.show_message("Link updated successfully.", MessageKind::Success);
                store.cancel_edit();
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Update failed for {}: {}", id, e);
                self.report(
                    format!(
                        "Error updating: {}",
                        user_error_text(&e, "failed to update the link")
                    ),
                    MessageKind::Error,
                );
                Outcome::Failed
            }
        }
    }

    /// Delete a link after `confirm` accepts the prompt.
    pub async fn remove<F>(&self, id: &str, label: &str, confirm: F) -> Outcome
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(&delete_prompt(label)) {
            debug!("Delete of {} not confirmed", id);
            return Outcome::Skipped;
        }

        let _pending = self.pending();

        match self.api.delete_link(id).await {
            Ok(()) => {
                info!("Deleted link {}", id);
                self.report(format!("Link '{}' deleted.", label), MessageKind::Success);
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("Delete failed for {}: {}", id, e);
                self.report(
                    format!(
                        "Error deleting: {}",
                        user_error_text(&e, "failed to delete the link")
                    ),
                    MessageKind::Error,
                );
                Outcome::Failed
            }
        }
    }

    /// Ask the server for a title and category for `url` and merge them into
    /// the `target` draft. Failures are logged, never shown.
    pub async fn analyze(&self, url: &str, target: DraftTarget) -> Outcome {
        let url = url.trim();
        if !is_web_url(url) {
            return Outcome::Skipped;
        }

        let _analyzing = self.analyzing();

        match self.api.analyze_link(url).await {
            Ok(analysis) => {
                debug!("Analysis for {}: {:?}", url, analysis);
                match self.lock().draft_mut(target) {
                    Some(draft) => draft.apply_analysis(&analysis),
                    None => debug!("Draft for {} closed before analysis returned", url),
                }
                Outcome::Succeeded
            }
            Err(e) => {
                warn!("URL analysis failed for {}: {}", url, e);
                Outcome::Failed
            }
        }
    }

    /// Analyze whatever url the active draft holds right now.
    pub async fn analyze_active(&self) -> Outcome {
        let (url, target) = {
            let store = self.lock();
            (store.active_draft().url.clone(), store.target())
        };
        self.analyze(&url, target).await
    }

    /// Second half of a mutation: refetch when the mutation succeeded.
    pub async fn resync(&self, outcome: Outcome) -> Outcome {
        if outcome.needs_resync() {
            self.fetch_all().await
        } else {
            Outcome::Skipped
        }
    }
}

/// Keeps the loading or analyzing counter raised for its lifetime.
struct Pending<'a> {
    store: &'a Mutex<LinkStore>,
    analysis: bool,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        if self.analysis {
            store.end_analysis();
        } else {
            store.end_request();
        }
    }
}
