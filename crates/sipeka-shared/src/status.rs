//! Submission lifecycle and the actions each state permits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::SubmissionId;

/// Processing state of a letter request.
///
/// The backend reports Indonesian labels (`diajukan`, `diproses`,
/// `ditolak`, `selesai`); unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    Submitted,
    InReview,
    Rejected,
    Completed,
    Other(String),
}

impl SubmissionStatus {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "diajukan" | "submitted" | "pending" => Self::Submitted,
            "diproses" | "in_review" | "in-review" | "review" | "processing" => Self::InReview,
            "ditolak" | "rejected" => Self::Rejected,
            "selesai" | "completed" | "done" => Self::Completed,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Label in the backend's vocabulary.
    pub fn label(&self) -> &str {
        match self {
            Self::Submitted => "diajukan",
            Self::InReview => "diproses",
            Self::Rejected => "ditolak",
            Self::Completed => "selesai",
            Self::Other(label) => label,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// `Other` states are opaque, so any move into or out of them is
    /// accepted as reported by the backend.
    pub fn can_transition_to(&self, next: &SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Other(_), _) | (_, Other(_)) => true,
            (Submitted, InReview | Completed | Rejected) => true,
            (InReview, Completed | Rejected) => true,
            (Rejected, Submitted) => true,
            _ => false,
        }
    }
}

impl From<String> for SubmissionStatus {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Actions a user may take on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionSet {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub download: bool,
}

/// The one place that decides what a submission's status permits.
pub fn allowed_actions(status: &SubmissionStatus) -> ActionSet {
    let view_only = ActionSet {
        view: true,
        ..ActionSet::default()
    };
    match status {
        SubmissionStatus::Rejected => ActionSet {
            edit: true,
            delete: true,
            ..view_only
        },
        SubmissionStatus::Submitted => ActionSet {
            delete: true,
            ..view_only
        },
        SubmissionStatus::Completed => ActionSet {
            download: true,
            ..view_only
        },
        SubmissionStatus::InReview | SubmissionStatus::Other(_) => view_only,
    }
}

/// Ticket handed out when a list refresh starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Last-known status of every submission the user has seen.
///
/// List responses are applied only if they belong to the newest refresh
/// applied so far; a slower, older request can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct StatusTracker {
    statuses: HashMap<SubmissionId, SubmissionStatus>,
    next_ticket: u64,
    applied: Option<RefreshTicket>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh; pass the ticket back to [`StatusTracker::apply`].
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.next_ticket += 1;
        RefreshTicket(self.next_ticket)
    }

    /// Replace the known statuses with a full list response.
    ///
    /// Returns `false` (and changes nothing) when a newer refresh has
    /// already been applied.
    pub fn apply<I>(&mut self, ticket: RefreshTicket, statuses: I) -> bool
    where
        I: IntoIterator<Item = (SubmissionId, SubmissionStatus)>,
    {
        if self.applied.is_some_and(|applied| applied >= ticket) {
            return false;
        }
        self.statuses = statuses.into_iter().collect();
        self.applied = Some(ticket);
        true
    }

    /// Update only the given rows from a partial list response.
    ///
    /// Sequenced like [`StatusTracker::apply`]: returns `false` (and changes
    /// nothing) when a newer refresh has already been applied.
    pub fn merge<I>(&mut self, ticket: RefreshTicket, statuses: I) -> bool
    where
        I: IntoIterator<Item = (SubmissionId, SubmissionStatus)>,
    {
        if self.applied.is_some_and(|applied| applied >= ticket) {
            return false;
        }
        self.statuses.extend(statuses);
        self.applied = Some(ticket);
        true
    }

    /// Record the status of one submission from a detail fetch.
    ///
    /// The backend is authoritative, so the status is always stored. Returns
    /// `false` when the move is not one the lifecycle allows.
    pub fn observe(&mut self, id: SubmissionId, status: SubmissionStatus) -> bool {
        let expected = self
            .statuses
            .get(&id)
            .map_or(true, |known| known.can_transition_to(&status));
        self.statuses.insert(id, status);
        expected
    }

    /// Optimistic update after a successful create or resubmit call.
    pub fn mark_submitted(&mut self, id: SubmissionId) {
        self.statuses.insert(id, SubmissionStatus::Submitted);
    }

    pub fn forget(&mut self, id: SubmissionId) {
        self.statuses.remove(&id);
    }

    pub fn status(&self, id: SubmissionId) -> Option<&SubmissionStatus> {
        self.statuses.get(&id)
    }

    pub fn actions(&self, id: SubmissionId) -> Option<ActionSet> {
        self.status(id).map(allowed_actions)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
