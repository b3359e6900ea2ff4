//! Shared test utilities and arbitrary generators for property-based testing.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use crate::comment::{CommentHistory, Entry};
use crate::types::{
    CommentId, JobKind, JobResult, JobState, PrNumber, Pull, RepoId, ReviewUnit, Sha,
};

pub fn arb_job_state() -> impl Strategy<Value = JobState> {
    prop_oneof![
        Just(JobState::Triggered),
        Just(JobState::Pending),
        Just(JobState::Success),
        Just(JobState::Failure),
        Just(JobState::Error),
        Just(JobState::Aborted),
    ]
}

pub fn arb_job_kind() -> impl Strategy<Value = JobKind> {
    prop_oneof![
        Just(JobKind::Presubmit),
        Just(JobKind::Postsubmit),
        Just(JobKind::Periodic),
        Just(JobKind::Batch),
    ]
}

/// Rows keyed from a small pool so that duplicates across comments are common.
pub fn arb_entry() -> impl Strategy<Value = Entry> {
    (0..6u8, "[a-z0-9]{1,8}")
        .prop_map(|(key, detail)| Entry::new(format!("k{key} | {detail} | [link]()")))
}

/// A parsed history with distinct comment IDs.
pub fn arb_history() -> impl Strategy<Value = CommentHistory> {
    (
        prop::collection::vec(arb_entry(), 0..10),
        prop::collection::btree_set(any::<u64>(), 0..5),
    )
        .prop_map(|(entries, ids)| {
            let mut ids: Vec<CommentId> = ids.into_iter().map(CommentId).collect();
            let latest = ids.pop();
            CommentHistory {
                entries,
                latest,
                previous: ids,
            }
        })
}

/// Builder for job results with predictable defaults.
///
/// Defaults: repo `org/repo`, base commit `basesha` pushed by `pusher`, one
/// pull (#1, head `headsha`, by `pr-author`), state success, reporting on and
/// complete.
pub struct JobBuilder {
    job: JobResult,
}

impl JobBuilder {
    fn new(context: &str, kind: JobKind) -> Self {
        JobBuilder {
            job: JobResult {
                job: format!("job-{context}"),
                context: context.to_string(),
                kind,
                state: JobState::Success,
                description: String::new(),
                url: String::new(),
                rerun_command: String::new(),
                optional: None,
                report: true,
                comment_on_postsubmit: false,
                completed_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                unit: ReviewUnit {
                    repo: RepoId::new("org", "repo"),
                    base_sha: Sha::new("basesha"),
                    author: "pusher".to_string(),
                    pulls: vec![Pull {
                        number: PrNumber(1),
                        sha: Sha::new("headsha"),
                        author: "pr-author".to_string(),
                    }],
                },
            },
        }
    }

    pub fn presubmit(context: &str) -> Self {
        Self::new(context, JobKind::Presubmit)
    }

    pub fn postsubmit(context: &str) -> Self {
        Self::new(context, JobKind::Postsubmit)
    }

    pub fn kind(mut self, kind: JobKind) -> Self {
        self.job.kind = kind;
        self
    }

    pub fn job_name(mut self, name: &str) -> Self {
        self.job.job = name.to_string();
        self
    }

    pub fn state(mut self, state: JobState) -> Self {
        self.job.state = state;
        self
    }

    pub fn optional(mut self, optional: Option<bool>) -> Self {
        self.job.optional = optional;
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.job.url = url.to_string();
        self
    }

    pub fn rerun(mut self, command: &str) -> Self {
        self.job.rerun_command = command.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.job.description = description.to_string();
        self
    }

    pub fn report(mut self, report: bool) -> Self {
        self.job.report = report;
        self
    }

    pub fn incomplete(mut self) -> Self {
        self.job.completed_at = None;
        self
    }

    pub fn comment_on_postsubmit(mut self, enabled: bool) -> Self {
        self.job.comment_on_postsubmit = enabled;
        self
    }

    pub fn pulls(mut self, pulls: Vec<Pull>) -> Self {
        self.job.unit.pulls = pulls;
        self
    }

    pub fn build(self) -> JobResult {
        self.job
    }
}

/// A pull with the given number, head and author.
pub fn pull(number: u64, sha: &str, author: &str) -> Pull {
    Pull {
        number: PrNumber(number),
        sha: Sha::new(sha),
        author: author.to_string(),
    }
}
