//! Recovering report rows from the comment history.
//!
//! Only comments that the bot wrote AND that carry the report marker are
//! considered; everything else on the pull or commit is left alone.

use super::entry::Entry;
use super::{REPORT_MARKER, TABLE_DIVIDER_PREFIX};
use crate::types::{CommentData, CommentId};

/// What the bot's earlier report comments contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentHistory {
    /// Table rows of every report comment, in encounter order.
    pub entries: Vec<Entry>,
    /// The most recent report comment, if any.
    pub latest: Option<CommentId>,
    /// Every older report comment. These are always stale.
    pub previous: Vec<CommentId>,
}

impl CommentHistory {
    /// Records the next report comment in listing order.
    fn push(mut self, id: CommentId, entries: Vec<Entry>) -> Self {
        self.previous.extend(self.latest.replace(id));
        self.entries.extend(entries);
        self
    }
}

/// Folds a comment listing (assumed chronological) into the report history.
///
/// `is_bot` decides whether a comment author is the reporting bot.
pub fn parse_comments<'a, I, F>(comments: I, is_bot: F) -> CommentHistory
where
    I: IntoIterator<Item = &'a CommentData>,
    F: Fn(&str) -> bool,
{
    comments
        .into_iter()
        .filter(|comment| is_bot(&comment.author) && comment.body.contains(REPORT_MARKER))
        .fold(CommentHistory::default(), |history, comment| {
            history.push(comment.id, extract_entries(&comment.body))
        })
}

/// Extracts the table rows from a report comment body.
///
/// A line starting with the divider opens the table, a blank line closes it,
/// and every other line in between is a row. Lines are trimmed, which also
/// takes care of `\r\n` endings.
pub fn extract_entries(body: &str) -> Vec<Entry> {
    let mut in_table = false;
    let mut entries = Vec::new();

    for line in body.lines().map(str::trim) {
        if line.starts_with(TABLE_DIVIDER_PREFIX) {
            in_table = true;
        } else if line.is_empty() {
            in_table = false;
        } else if in_table {
            entries.push(Entry::new(line));
        }
    }

    entries
}
