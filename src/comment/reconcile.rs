//! Merging the comment history with the current job batch.
//!
//! This is a pure function of the parsed history and the batch. The
//! reporter turns its result into remote deletes, creates and edits.
//!
//! Rules:
//! - when several rows share a key, only the last one seen survives;
//! - a row whose key is a job in the current batch is dropped, whatever the
//!   job's new state;
//! - every failed job in the batch adds a fresh row at the end;
//! - all older report comments are deleted. The latest one is deleted too
//!   when fresh rows were added (so the author gets a new notification) or
//!   when nothing is left to report; otherwise it is edited in place.

use std::collections::{HashMap, HashSet};

use super::entry::Entry;
use super::parse::CommentHistory;
use crate::types::{CommentId, JobResult, JobState};

/// The remote write needed after deletes have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    /// Post a new report comment.
    Create,
    /// Rewrite the surviving report comment.
    Update(CommentId),
}

/// The outcome of reconciling history with a job batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Report comments to delete.
    pub deletes: Vec<CommentId>,
    /// Rows of the report, carried-over rows first.
    pub entries: Vec<Entry>,
    /// The report comment that survives and should be edited, if any.
    pub update: Option<CommentId>,
}

impl Reconciliation {
    /// Decides what to write once the deletes are done.
    ///
    /// Nothing is written when there are no rows, unless `force` asks for a
    /// comment anyway (it then reads "all tests passed").
    pub fn action(&self, force: bool) -> Option<CommentAction> {
        if self.entries.is_empty() && !force {
            return None;
        }
        Some(match self.update {
            Some(id) => CommentAction::Update(id),
            None => CommentAction::Create,
        })
    }
}

/// Reconciles the parsed comment history with the current job batch.
pub fn reconcile(history: CommentHistory, jobs: &[JobResult]) -> Reconciliation {
    let CommentHistory {
        entries: historical,
        latest,
        previous,
    } = history;

    let current: HashSet<&str> = jobs.iter().map(|job| job.context.as_str()).collect();
    let last_seen: HashMap<&str, usize> = historical
        .iter()
        .enumerate()
        .map(|(index, entry)| (entry.key(), index))
        .collect();

    let mut entries: Vec<Entry> = historical
        .iter()
        .enumerate()
        .filter(|(index, entry)| {
            last_seen.get(entry.key()) == Some(index) && !current.contains(entry.key())
        })
        .map(|(_, entry)| entry.clone())
        .collect();

    let fresh: Vec<Entry> = jobs
        .iter()
        .filter(|job| job.state == JobState::Failure)
        .map(Entry::for_job)
        .collect();
    let must_create = !fresh.is_empty();
    entries.extend(fresh);

    let mut deletes = previous;
    let update = match latest {
        Some(id) if must_create || entries.is_empty() => {
            deletes.push(id);
            None
        }
        latest => latest,
    };

    Reconciliation {
        deletes,
        entries,
        update,
    }
}
