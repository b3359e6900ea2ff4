//! Commit status mapping.
//!
//! Every job state maps onto one of the four status literals the host accepts.
//! Which jobs report at all is decided by [`should_report`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{JobKind, JobResult, JobState, UnknownState};

/// A commit status state as understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Pending,
    Success,
    Error,
    Failure,
}

impl HostStatus {
    /// Returns the literal sent to the host.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            HostStatus::Pending => "pending",
            HostStatus::Success => "success",
            HostStatus::Error => "error",
            HostStatus::Failure => "failure",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Maps a job state to the host status vocabulary.
///
/// Aborted jobs show as failures: the change did not pass.
pub fn map_state(state: JobState) -> HostStatus {
    match state {
        JobState::Triggered | JobState::Pending => HostStatus::Pending,
        JobState::Success => HostStatus::Success,
        JobState::Error => HostStatus::Error,
        JobState::Failure | JobState::Aborted => HostStatus::Failure,
    }
}

/// Maps a raw state name, failing on names outside the job vocabulary.
pub fn map_state_name(name: &str) -> Result<HostStatus, UnknownState> {
    name.parse().map(map_state)
}

/// Returns true if the job reports to the host at all.
///
/// The job's kind must be one the reporter is configured for, and the job
/// itself must have reporting switched on.
pub fn should_report(job: &JobResult, allowed: &[JobKind]) -> bool {
    allowed.contains(&job.kind) && job.report
}

/// The payload of one status call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitStatus {
    pub state: HostStatus,
    /// Passed through untouched; length limits are the caller's concern.
    pub description: String,
    pub context: String,
    pub target_url: String,
}

impl CommitStatus {
    pub fn for_job(job: &JobResult) -> Self {
        CommitStatus {
            state: map_state(job.state),
            description: job.description.clone(),
            context: job.context.clone(),
            target_url: job.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JobBuilder, arb_job_kind, arb_job_state};
    use proptest::prelude::*;

    #[test]
    fn state_table() {
        let cases = [
            (JobState::Triggered, "pending"),
            (JobState::Pending, "pending"),
            (JobState::Success, "success"),
            (JobState::Error, "error"),
            (JobState::Failure, "failure"),
            (JobState::Aborted, "failure"),
        ];
        for (state, expected) in cases {
            assert_eq!(map_state(state).as_api_str(), expected, "{state}");
        }
    }

    #[test]
    fn unknown_state_name_is_an_error() {
        assert_eq!(
            map_state_name("exploded"),
            Err(UnknownState("exploded".to_string()))
        );
        assert_eq!(map_state_name("aborted"), Ok(HostStatus::Failure));
    }

    #[test]
    fn should_report_requires_kind_and_flag() {
        let allowed = [JobKind::Presubmit];
        let presubmit = JobBuilder::presubmit("a").build();
        let silent = JobBuilder::presubmit("a").report(false).build();
        let postsubmit = JobBuilder::postsubmit("a").build();
        assert!(should_report(&presubmit, &allowed));
        assert!(!should_report(&silent, &allowed));
        assert!(!should_report(&postsubmit, &allowed));
        assert!(!should_report(&presubmit, &[]));
    }

    #[test]
    fn status_payload_copies_job_fields() {
        let job = JobBuilder::presubmit("unit")
            .state(JobState::Failure)
            .description("Job failed.")
            .url("https://ci/1")
            .build();
        assert_eq!(
            CommitStatus::for_job(&job),
            CommitStatus {
                state: HostStatus::Failure,
                description: "Job failed.".to_string(),
                context: "unit".to_string(),
                target_url: "https://ci/1".to_string(),
            }
        );
    }

    proptest! {
        #[test]
        fn mapping_agrees_with_wire_names(state in arb_job_state()) {
            prop_assert_eq!(map_state_name(state.as_str()), Ok(map_state(state)));
        }

        #[test]
        fn only_terminal_successes_map_to_success(state in arb_job_state()) {
            let success = map_state(state) == HostStatus::Success;
            prop_assert_eq!(success, state == JobState::Success);
        }

        #[test]
        fn disabled_jobs_never_report(
            kind in arb_job_kind(),
            allowed in prop::collection::vec(arb_job_kind(), 0..4),
        ) {
            let job = JobBuilder::presubmit("a").kind(kind).report(false).build();
            prop_assert!(!should_report(&job, &allowed));
        }
    }
}
