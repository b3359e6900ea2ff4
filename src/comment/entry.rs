//! Report table rows.

use std::fmt;

use super::FIELD_DELIMITER;
use crate::types::{JobKind, JobResult};

/// One row of the report table, keyed by the job context in its first field.
///
/// Rows recovered from earlier comments are opaque text; the reporter only
/// ever looks at their key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry(String);

impl Entry {
    pub fn new(line: impl Into<String>) -> Self {
        Entry(line.into())
    }

    /// Renders a fresh row for a failed job.
    ///
    /// Post-merge rows have three fields (context, base commit, link); all
    /// others have five (context, head commit, link, required, rerun command).
    pub fn for_job(job: &JobResult) -> Self {
        let link = format!("[link]({})", job.url);
        let fields = if job.kind == JobKind::Postsubmit {
            vec![job.context.clone(), job.unit.base_sha.to_string(), link]
        } else {
            let head = job
                .unit
                .first_pull()
                .map(|pull| pull.sha.to_string())
                .unwrap_or_default();
            vec![
                job.context.clone(),
                head,
                link,
                job.required_label().to_string(),
                format!("`{}`", job.rerun_command),
            ]
        };
        Entry(fields.join(FIELD_DELIMITER))
    }

    /// Everything before the first field delimiter.
    pub fn key(&self) -> &str {
        self.0.split(FIELD_DELIMITER).next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
