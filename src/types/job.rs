//! Job results and the review unit they are scoped to.
//!
//! A `JobResult` is built fresh by the caller for every reporting call from
//! upstream job state. Nothing here is persisted.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::{PrNumber, RepoId, Sha};

/// A job state name that is not part of the job vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job state: {0}")]
pub struct UnknownState(pub String);

/// The outcome state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum JobState {
    /// Scheduled but not yet running.
    Triggered,
    /// Running.
    Pending,
    Success,
    Failure,
    /// The job could not run (e.g. an invalid pod spec).
    Error,
    /// Cancelled before it finished.
    Aborted,
}

impl JobState {
    /// Returns the wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Triggered => "triggered",
            JobState::Pending => "pending",
            JobState::Success => "success",
            JobState::Failure => "failure",
            JobState::Error => "error",
            JobState::Aborted => "aborted",
        }
    }
}

impl FromStr for JobState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triggered" => Ok(JobState::Triggered),
            "pending" => Ok(JobState::Pending),
            "success" => Ok(JobState::Success),
            "failure" => Ok(JobState::Failure),
            "error" => Ok(JobState::Error),
            "aborted" => Ok(JobState::Aborted),
            other => Err(UnknownState(other.to_string())),
        }
    }
}

impl TryFrom<String> for JobState {
    type Error = UnknownState;

    fn try_from(s: String) -> Result<Self, UnknownState> {
        s.parse()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Runs against a proposed change before it merges.
    Presubmit,
    /// Runs after a change has landed on the base branch.
    Postsubmit,
    /// Runs on a schedule, usually with no pull attached.
    Periodic,
    /// Runs several pulls merged together.
    Batch,
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "presubmit" => Ok(JobKind::Presubmit),
            "postsubmit" => Ok(JobKind::Postsubmit),
            "periodic" => Ok(JobKind::Periodic),
            "batch" => Ok(JobKind::Batch),
            other => Err(format!("unknown job kind: {other}")),
        }
    }
}

/// A pull request under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub number: PrNumber,
    /// Head commit of the pull.
    pub sha: Sha,
    pub author: String,
}

/// The (repo, pull-or-base-commit) tuple job results and comments are scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewUnit {
    pub repo: RepoId,
    pub base_sha: Sha,
    /// Author of the pushed base commit; addressed by post-merge reports.
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub pulls: Vec<Pull>,
}

impl ReviewUnit {
    pub fn first_pull(&self) -> Option<&Pull> {
        self.pulls.first()
    }

    /// Returns true if this unit tests more than one pull at once.
    ///
    /// Batch units are not reported on.
    pub fn is_batch(&self) -> bool {
        self.pulls.len() > 1
    }
}

/// The outcome of one job, as handed to the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job name, as configured upstream.
    pub job: String,
    /// Unique name of the job within its review unit. Doubles as the status
    /// context and the key of the job's row in the report table.
    pub context: String,
    pub kind: JobKind,
    pub state: JobState,
    #[serde(default)]
    pub description: String,
    /// Link to the job's results.
    #[serde(default)]
    pub url: String,
    /// Command a reviewer can comment to rerun the job.
    #[serde(default)]
    pub rerun_command: String,
    /// Whether a pre-merge failure is non-blocking. `None` when unknown.
    #[serde(default)]
    pub optional: Option<bool>,
    /// Whether this job reports to the review host at all.
    #[serde(default)]
    pub report: bool,
    /// Whether a post-merge job maintains a failure comment on its commit.
    #[serde(default)]
    pub comment_on_postsubmit: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub unit: ReviewUnit,
}

impl JobResult {
    /// Returns true once the job has finished.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_postsubmit(&self) -> bool {
        self.kind == JobKind::Postsubmit
    }

    /// The commit a status for this job is set on.
    ///
    /// Pre-merge jobs with a pull report against the pull's head; everything
    /// else reports against the base commit.
    pub fn status_sha(&self) -> &Sha {
        match self.unit.first_pull() {
            Some(pull) if !self.is_postsubmit() => &pull.sha,
            _ => &self.unit.base_sha,
        }
    }

    /// The user a comment about this job is addressed to.
    pub fn author(&self) -> &str {
        if self.is_postsubmit() {
            return &self.unit.author;
        }
        self.unit
            .first_pull()
            .map(|pull| pull.author.as_str())
            .unwrap_or_default()
    }

    /// The rendered value of the "required" column.
    pub fn required_label(&self) -> &'static str {
        match (self.kind, self.optional) {
            (JobKind::Presubmit, Some(true)) => "false",
            (JobKind::Presubmit, Some(false)) => "true",
            _ => "unknown",
        }
    }
}
