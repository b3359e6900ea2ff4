//! The failure report comment: parsing, reconciliation and rendering.
//!
//! The reporter keeps at most one report comment per review unit. Its body is
//! a markdown table of failing jobs followed by a hidden marker:
//!
//! ```text
//! @alice: The following test **failed**, say `/retest` to rerun all failed tests ...
//!
//! Test name | Commit | Details | Required | Rerun command
//! --- | --- | --- | --- | ---
//! unit | 1a2b3c | [link](https://ci/1) | true | `/test unit`
//!
//! <details>
//! ...
//! </details>
//! <!-- test report -->
//! ```
//!
//! There is no other store: each run recovers the table rows from the bot's own
//! marked comments, merges them with the current job batch and rewrites the
//! comment history so that exactly one up-to-date report remains.

pub mod entry;
pub mod format;
pub mod parse;
pub mod reconcile;
pub mod template;

pub use entry::Entry;
pub use format::{format_postsubmit_note, format_report_comment};
pub use parse::{CommentHistory, extract_entries, parse_comments};
pub use reconcile::{CommentAction, Reconciliation, reconcile};
pub use template::{RenderError, ReportTemplate};

/// Hidden tag embedded in every report comment. Its presence is the only
/// signal that a comment is managed by the reporter.
pub const REPORT_MARKER: &str = "<!-- test report -->";

/// A trimmed line starting with this opens the table body.
pub const TABLE_DIVIDER_PREFIX: &str = "---";

/// Field separator within a table row.
pub const FIELD_DELIMITER: &str = " | ";

/// Note left once on a pull when post-merge jobs ran for its merge commit.
pub const POSTSUBMIT_NOTE: &str = "postsubmit job(s) were triggered at commit: ";
