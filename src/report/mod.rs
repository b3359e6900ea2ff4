//! Reporting job results to the review host.
//!
//! A [`Reporter`] owns a host client and drives one reporting run per call:
//! set the commit status, then bring the failure report comment in line with
//! the batch. Runs hold no state between calls. Everything is re-derived from
//! the host's comment listing, so repeating a run is harmless and a run that
//! failed halfway is repaired by the next one.
//!
//! Runs against the same review unit must not overlap: two concurrent runs
//! can both see no report comment and both create one.

pub mod client;
pub mod error;
pub mod status;


pub use client::{BotUser, CommentReader, CommentWriter, StatusWriter};
pub use error::ReportError;
pub use status::{CommitStatus, HostStatus, map_state, map_state_name, should_report};

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::comment::{
    CommentAction, POSTSUBMIT_NOTE, ReportTemplate, format_postsubmit_note,
    format_report_comment, parse_comments, reconcile,
};
use crate::config::ReporterConfig;
use crate::types::{CommentTarget, JobResult};

/// Reports job results through a host client.
pub struct Reporter<C> {
    client: C,
    config: ReporterConfig,
    template: Option<ReportTemplate>,
    cancel: CancellationToken,
}

impl<C> Reporter<C> {
    pub fn new(client: C, config: ReporterConfig) -> Self {
        Reporter {
            client,
            config,
            template: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Appends the template's output to every report comment.
    pub fn with_template(mut self, template: ReportTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Aborts in-flight host calls when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs one host call, racing it against cancellation.
    async fn remote<T, E>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, ReportError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!(operation, "host call cancelled");
                Err(ReportError::Cancelled { operation })
            }
            result = call => result.map_err(|e| ReportError::remote(operation, e)),
        }
    }
}

impl<C: StatusWriter> Reporter<C> {
    /// Sets the commit status for one job.
    ///
    /// Jobs that should not report, and jobs testing several pulls at once,
    /// are skipped without a host call.
    #[instrument(
        skip(self, job),
        fields(repo = %job.unit.repo, context = %job.context, state = %job.state)
    )]
    pub async fn report_status(&self, job: &JobResult) -> Result<(), ReportError> {
        if !should_report(job, &self.config.job_types_to_report) {
            debug!("job does not report, skipping status");
            return Ok(());
        }
        if job.unit.is_batch() {
            debug!(pulls = job.unit.pulls.len(), "batch unit, skipping status");
            return Ok(());
        }

        let sha = job.status_sha();
        let status = CommitStatus::for_job(job);
        self.remote(
            "setting status",
            self.client.create_status(&job.unit.repo, sha, &status),
        )
        .await?;
        info!(sha = %sha.short(), status = %status.state, "set commit status");
        Ok(())
    }
}

impl<C: CommentReader + CommentWriter> Reporter<C> {
    /// Brings the failure report comments in line with a batch of jobs.
    ///
    /// All jobs must belong to the same review unit. Complete, reporting jobs
    /// are split into a pre-merge group (reported on the pull) and a
    /// post-merge group (reported on the base commit, for jobs that opted
    /// in), each synchronized separately. When `must_create` is set a comment
    /// is written even if nothing failed.
    #[instrument(skip(self, jobs), fields(jobs = jobs.len()))]
    pub async fn report_comment(
        &self,
        jobs: &[JobResult],
        must_create: bool,
    ) -> Result<(), ReportError> {
        if jobs.is_empty() {
            return Err(ReportError::EmptyBatch);
        }

        let (postsubmits, presubmits): (Vec<JobResult>, Vec<JobResult>) = jobs
            .iter()
            .filter(|job| {
                should_report(job, &self.config.job_types_to_report) && job.is_complete()
            })
            .filter(|job| !job.is_postsubmit() || job.comment_on_postsubmit)
            .cloned()
            .partition(JobResult::is_postsubmit);

        if let Some(batch) = presubmits
            .iter()
            .chain(&postsubmits)
            .find(|job| job.unit.is_batch())
        {
            return Err(ReportError::MultiPullBatch {
                pulls: batch.unit.pulls.len(),
            });
        }

        for group in [&presubmits, &postsubmits] {
            if group.is_empty() {
                continue;
            }
            self.sync_comments(group, must_create).await?;
        }

        if let Some(first) = postsubmits.first() {
            self.post_commit_note(first).await?;
        }
        Ok(())
    }

    /// Reconciles the report comment for one group of jobs.
    async fn sync_comments(
        &self,
        jobs: &[JobResult],
        must_create: bool,
    ) -> Result<(), ReportError> {
        let Some(first) = jobs.first() else {
            return Ok(());
        };
        let repo = &first.unit.repo;
        let location = if first.is_postsubmit() {
            CommentTarget::Commit {
                sha: first.unit.base_sha.clone(),
            }
        } else {
            match first.unit.first_pull() {
                Some(pull) => CommentTarget::Issue { pr: pull.number },
                None => {
                    debug!(context = %first.context, "no pull to comment on");
                    return Ok(());
                }
            }
        };

        let comments = self
            .remote(
                "listing comments",
                self.client.list_comments(repo, &location),
            )
            .await?;
        let bot = self
            .remote("getting bot identity", self.client.bot_user())
            .await?;

        let history = parse_comments(&comments, |login| bot.matches(login));
        let reconciliation = reconcile(history, jobs);
        debug!(
            %location,
            entries = reconciliation.entries.len(),
            deletes = reconciliation.deletes.len(),
            "reconciled report"
        );

        // Render before touching anything so a template failure changes nothing.
        let write = reconciliation
            .action(must_create)
            .map(|action| {
                format_report_comment(
                    first,
                    &reconciliation.entries,
                    self.template.as_ref(),
                    &self.config.about,
                )
                .map(|body| (action, body))
            })
            .transpose()?;

        for id in &reconciliation.deletes {
            self.remote(
                "deleting comment",
                self.client.delete_comment(repo, &location, *id),
            )
            .await?;
            debug!(%location, comment = %id, "deleted stale report");
        }

        match write {
            Some((CommentAction::Create, body)) => {
                self.remote(
                    "creating comment",
                    self.client.create_comment(repo, &location, &body),
                )
                .await?;
                let entries = reconciliation.entries.len();
                info!(%location, entries, "created report");
            }
            Some((CommentAction::Update(id), body)) => {
                self.remote(
                    "updating comment",
                    self.client.edit_comment(repo, &location, id, &body),
                )
                .await?;
                let entries = reconciliation.entries.len();
                info!(%location, comment = %id, entries, "updated report");
            }
            None => debug!(%location, "nothing to report"),
        }
        Ok(())
    }

    /// Leaves a note on the pull pointing at the commit post-merge jobs ran on.
    ///
    /// Posted at most once per pull.
    async fn post_commit_note(&self, job: &JobResult) -> Result<(), ReportError> {
        let Some(pull) = job.unit.first_pull() else {
            return Ok(());
        };
        let repo = &job.unit.repo;
        let location = CommentTarget::Issue { pr: pull.number };

        let comments = self
            .remote(
                "listing comments",
                self.client.list_comments(repo, &location),
            )
            .await?;
        let bot = self
            .remote("getting bot identity", self.client.bot_user())
            .await?;
        if comments
            .iter()
            .any(|comment| bot.matches(&comment.author) && comment.body.contains(POSTSUBMIT_NOTE))
        {
            debug!(%location, "commit note already present");
            return Ok(());
        }

        let note = format_postsubmit_note(&job.unit.base_sha);
        self.remote(
            "creating comment",
            self.client.create_comment(repo, &location, &note),
        )
        .await?;
        info!(%location, sha = %job.unit.base_sha.short(), "posted commit note");
        Ok(())
    }
}

impl<C: StatusWriter + CommentReader + CommentWriter> Reporter<C> {
    /// Reports a single job: its commit status, then its report comment.
    #[instrument(skip(self, job), fields(repo = %job.unit.repo, context = %job.context))]
    pub async fn report(&self, job: &JobResult) -> Result<(), ReportError> {
        self.report_status(job).await?;
        self.report_comment(std::slice::from_ref(job), false).await
    }
}
