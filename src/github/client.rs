//! Octocrab client wrapper.
//!
//! `OctocrabClient` wraps an `Octocrab` instance and implements the reporter's
//! host capabilities against the GitHub REST API. It is not scoped to a
//! repository: every call names the repository it targets.

use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::error::GitHubApiError;
use crate::report::{BotUser, CommentReader, CommentWriter, CommitStatus, StatusWriter};
use crate::types::{CommentData, CommentId, CommentTarget, RepoId, Sha};

const PAGE_SIZE: u8 = 100;

/// A GitHub API client.
#[derive(Clone)]
pub struct OctocrabClient {
    client: Octocrab,

    /// Login to report as; looked up from the token when unset.
    bot_login: Option<String>,
}

impl OctocrabClient {
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            bot_login: None,
        }
    }

    /// Creates a client from a GitHub token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client))
    }

    /// Fixes the bot login instead of asking GitHub for the token's user.
    ///
    /// Needed for GitHub App installation tokens, which cannot call `/user`.
    pub fn with_bot_login(mut self, login: impl Into<String>) -> Self {
        self.bot_login = Some(login.into());
        self
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("bot_login", &self.bot_login)
            .finish_non_exhaustive()
    }
}

// ─── Request and response bodies ──────────────────────────────────────────────

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct StatusRequest<'a> {
    state: &'static str,
    description: &'a str,
    context: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    target_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommitCommentResponse {
    id: u64,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserResponse>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

impl From<CommitCommentResponse> for CommentData {
    fn from(comment: CommitCommentResponse) -> Self {
        CommentData {
            id: CommentId(comment.id),
            author: comment.user.map_or_else(String::new, |user| user.login),
            body: comment.body.unwrap_or_default(),
        }
    }
}

/// The REST path of a comment, which differs between pull and commit comments.
fn comment_route(repo: &RepoId, target: &CommentTarget, id: CommentId) -> String {
    match target {
        CommentTarget::Issue { .. } => format!("/repos/{repo}/issues/comments/{id}"),
        CommentTarget::Commit { .. } => format!("/repos/{repo}/comments/{id}"),
    }
}

// ─── Listing ──────────────────────────────────────────────────────────────────

impl OctocrabClient {
    async fn list_issue_comments(
        &self,
        repo: &RepoId,
        pr: u64,
    ) -> Result<Vec<CommentData>, GitHubApiError> {
        let mut page = 1u32;
        let mut all_comments = Vec::new();

        loop {
            let items = self
                .client
                .issues(&repo.owner, &repo.repo)
                .list_comments(pr)
                .per_page(PAGE_SIZE)
                .page(page)
                .send()
                .await
                .map_err(GitHubApiError::from_octocrab)?
                .items;
            let is_last_page = items.len() < usize::from(PAGE_SIZE);

            all_comments.extend(items.into_iter().map(|comment| CommentData {
                id: CommentId(comment.id.into_inner()),
                author: comment.user.login,
                body: comment.body.unwrap_or_default(),
            }));

            if is_last_page {
                break;
            }
            page += 1;
        }

        trace!(%repo, pr, count = all_comments.len(), "listed issue comments");
        Ok(all_comments)
    }

    async fn list_commit_comments(
        &self,
        repo: &RepoId,
        sha: &Sha,
    ) -> Result<Vec<CommentData>, GitHubApiError> {
        let mut page = 1u32;
        let mut all_comments = Vec::new();

        loop {
            let url = format!(
                "/repos/{repo}/commits/{sha}/comments?per_page={PAGE_SIZE}&page={page}"
            );
            let items: Vec<CommitCommentResponse> = self
                .client
                .get(&url, None::<&()>)
                .await
                .map_err(GitHubApiError::from_octocrab)?;
            let is_last_page = items.len() < usize::from(PAGE_SIZE);

            all_comments.extend(items.into_iter().map(CommentData::from));

            if is_last_page {
                break;
            }
            page += 1;
        }

        trace!(%repo, sha = %sha.short(), count = all_comments.len(), "listed commit comments");
        Ok(all_comments)
    }
}

// ─── Capabilities ─────────────────────────────────────────────────────────────

impl StatusWriter for OctocrabClient {
    type Error = GitHubApiError;

    async fn create_status(
        &self,
        repo: &RepoId,
        sha: &Sha,
        status: &CommitStatus,
    ) -> Result<(), GitHubApiError> {
        let url = format!("/repos/{repo}/statuses/{sha}");
        let request = StatusRequest {
            state: status.state.as_api_str(),
            description: &status.description,
            context: &status.context,
            target_url: &status.target_url,
        };

        let _: serde_json::Value = self
            .client
            .post(&url, Some(&request))
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        Ok(())
    }
}

impl CommentReader for OctocrabClient {
    type Error = GitHubApiError;

    async fn bot_user(&self) -> Result<BotUser, GitHubApiError> {
        if let Some(login) = &self.bot_login {
            return Ok(BotUser::new(login.clone()));
        }
        let user = self
            .client
            .current()
            .user()
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        Ok(BotUser::new(user.login))
    }

    async fn list_comments(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
    ) -> Result<Vec<CommentData>, GitHubApiError> {
        match target {
            CommentTarget::Issue { pr } => self.list_issue_comments(repo, pr.0).await,
            CommentTarget::Commit { sha } => self.list_commit_comments(repo, sha).await,
        }
    }
}

impl CommentWriter for OctocrabClient {
    type Error = GitHubApiError;

    async fn create_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        body: &str,
    ) -> Result<(), GitHubApiError> {
        match target {
            CommentTarget::Issue { pr } => {
                self.client
                    .issues(&repo.owner, &repo.repo)
                    .create_comment(pr.0, body)
                    .await
                    .map_err(GitHubApiError::from_octocrab)?;
            }
            CommentTarget::Commit { sha } => {
                let url = format!("/repos/{repo}/commits/{sha}/comments");
                let _: serde_json::Value = self
                    .client
                    .post(&url, Some(&CommentBody { body }))
                    .await
                    .map_err(GitHubApiError::from_octocrab)?;
            }
        }
        Ok(())
    }

    async fn edit_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        id: CommentId,
        body: &str,
    ) -> Result<(), GitHubApiError> {
        let url = comment_route(repo, target, id);
        let _: serde_json::Value = self
            .client
            .patch(&url, Some(&CommentBody { body }))
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        Ok(())
    }

    async fn delete_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        id: CommentId,
    ) -> Result<(), GitHubApiError> {
        // DELETE answers 204 with no body, so skip response deserialization.
        let url = comment_route(repo, target, id);
        let response = self
            .client
            ._delete(url, None::<&()>)
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        octocrab::map_github_error(response)
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        Ok(())
    }
}
