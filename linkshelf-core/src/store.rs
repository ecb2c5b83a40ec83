// Client-side state for the link collection, drafts and transient flags

use crate::draft::{DraftTarget, LinkDraft};
use linkshelf_api::{Link, StatEntry};
use std::time::{Duration, Instant};

/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    pub shown_at: Instant,
}

impl Message {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= MESSAGE_TTL
    }
}

/// State holder for one client session.
///
/// The link list is only ever replaced wholesale by a fetch; create, update
/// and delete never edit it locally. `sorted_links` and `total_links` are
/// recomputed when their source is replaced.
#[derive(Debug, Default)]
pub struct LinkStore {
    links: Vec<Link>,
    sorted: Vec<Link>,
    stats: Vec<StatEntry>,
    total_links: u64,
    form: LinkDraft,
    editing: Option<LinkDraft>,
    in_flight: usize,
    analyzing: usize,
    message: Option<Message>,
    fetches_issued: u64,
    links_applied: u64,
    stats_applied: u64,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Collection and stats
    // ------------------------------------------------------------------

    /// Links in the order the server returned them.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Links sorted by id, newest (highest) first.
    pub fn sorted_links(&self) -> &[Link] {
        &self.sorted
    }

    pub fn find_link(&self, id: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    pub fn stats(&self) -> &[StatEntry] {
        &self.stats
    }

    pub fn total_links(&self) -> u64 {
        self.total_links
    }

    /// Reserve a sequence number for a fetch about to be issued.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetches_issued += 1;
        self.fetches_issued
    }

    /// Replace the collection with the result of fetch `seq`. Results of a
    /// fetch issued before the last applied one are dropped.
    pub fn apply_links(&mut self, seq: u64, links: Vec<Link>) -> bool {
        if seq < self.links_applied {
            return false;
        }
        self.links_applied = seq;

        let mut sorted = links.clone();
        sorted.sort_by(|a, b| b.id.cmp(&a.id));
        self.links = links;
        self.sorted = sorted;
        true
    }

    /// Replace the stats with the result of fetch `seq`. Entries for the same
    /// category are merged.
    pub fn apply_stats(&mut self, seq: u64, stats: Vec<StatEntry>) -> bool {
        if seq < self.stats_applied {
            return false;
        }
        self.stats_applied = seq;

        let mut merged: Vec<StatEntry> = Vec::with_capacity(stats.len());
        for entry in stats {
            match merged.iter_mut().find(|e| e.category == entry.category) {
                Some(existing) => existing.count += entry.count,
                None => merged.push(entry),
            }
        }
        self.total_links = merged.iter().map(|s| s.count).sum();
        self.stats = merged;
        true
    }

    // ------------------------------------------------------------------
    // Drafts
    // ------------------------------------------------------------------

    pub fn form(&self) -> &LinkDraft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut LinkDraft {
        &mut self.form
    }

    pub fn reset_form(&mut self) {
        self.form = LinkDraft::default();
    }

    pub fn editing(&self) -> Option<&LinkDraft> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn start_edit(&mut self, link: &Link) {
        self.editing = Some(LinkDraft::from_link(link));
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// The mode the form is in, decided only by whether an edit is open.
    pub fn target(&self) -> DraftTarget {
        if self.editing.is_some() {
            DraftTarget::Edit
        } else {
            DraftTarget::Create
        }
    }

    pub fn active_draft(&self) -> &LinkDraft {
        self.editing.as_ref().unwrap_or(&self.form)
    }

    pub fn active_draft_mut(&mut self) -> &mut LinkDraft {
        match self.editing {
            Some(ref mut draft) => draft,
            None => &mut self.form,
        }
    }

    pub fn draft_mut(&mut self, target: DraftTarget) -> Option<&mut LinkDraft> {
        match target {
            DraftTarget::Create => Some(&mut self.form),
            DraftTarget::Edit => self.editing.as_mut(),
        }
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing > 0
    }

    pub(crate) fn begin_request(&mut self) {
        self.in_flight += 1;
    }

    pub(crate) fn end_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub(crate) fn begin_analysis(&mut self) {
        self.analyzing += 1;
    }

    pub(crate) fn end_analysis(&mut self) {
        self.analyzing = self.analyzing.saturating_sub(1);
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.show_message_at(text, kind, Instant::now());
    }

    pub fn show_message_at(&mut self, text: impl Into<String>, kind: MessageKind, now: Instant) {
        self.message = Some(Message {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }

    /// Clear the message once it has been visible for `MESSAGE_TTL`.
    /// Returns true when a message was removed.
    pub fn expire_message(&mut self, now: Instant) -> bool {
        if self.message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.message = None;
            return true;
        }
        false
    }
}
