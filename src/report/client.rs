//! Capability traits for the review host.
//!
//! The reporter never talks to a concrete API. It is generic over narrow
//! capabilities (setting statuses, reading comments, writing comments) so a
//! run can be driven against the real host or an in-memory fake.
//!
//! # Example (fake for testing)
//!
//! ```ignore
//! struct RecordingHost {
//!     statuses: Mutex<Vec<(Sha, CommitStatus)>>,
//! }
//!
//! impl StatusWriter for RecordingHost {
//!     type Error = std::convert::Infallible;
//!
//!     async fn create_status(
//!         &self,
//!         _repo: &RepoId,
//!         sha: &Sha,
//!         status: &CommitStatus,
//!     ) -> Result<(), Self::Error> {
//!         self.statuses.lock().unwrap().push((sha.clone(), status.clone()));
//!         Ok(())
//!     }
//! }
//! ```

use std::future::Future;

use super::status::CommitStatus;
use crate::types::{CommentData, CommentId, CommentTarget, RepoId, Sha};

/// The identity the reporter writes comments as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotUser {
    pub login: String,
}

impl BotUser {
    pub fn new(login: impl Into<String>) -> Self {
        BotUser {
            login: login.into(),
        }
    }

    /// Returns true if `candidate` is this bot.
    ///
    /// Logins compare case-insensitively, and an app's `[bot]` suffix is
    /// ignored on either side.
    pub fn matches(&self, candidate: &str) -> bool {
        strip_bot_suffix(&self.login).eq_ignore_ascii_case(strip_bot_suffix(candidate))
    }
}

fn strip_bot_suffix(login: &str) -> &str {
    login.strip_suffix("[bot]").unwrap_or(login)
}

/// Sets commit statuses.
pub trait StatusWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_status(
        &self,
        repo: &RepoId,
        sha: &Sha,
        status: &CommitStatus,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Reads comments and the bot's own identity.
pub trait CommentReader {
    type Error: std::error::Error + Send + Sync + 'static;

    fn bot_user(&self) -> impl Future<Output = Result<BotUser, Self::Error>> + Send;

    /// Lists every comment on the target, oldest first.
    fn list_comments(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
    ) -> impl Future<Output = Result<Vec<CommentData>, Self::Error>> + Send;
}

/// Creates, edits and deletes comments.
///
/// Edits and deletes carry the target because the host keeps pull comments
/// and commit comments in separate namespaces.
pub trait CommentWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        body: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn edit_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        id: CommentId,
        body: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_comment(
        &self,
        repo: &RepoId,
        target: &CommentTarget,
        id: CommentId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
