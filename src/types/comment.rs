//! Comments as seen on the review host.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CommentId, PrNumber, Sha};

/// Where a report comment lives.
///
/// Pre-merge reports go on the pull's conversation; post-merge reports go on
/// the landed commit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentTarget {
    Issue { pr: PrNumber },
    Commit { sha: Sha },
}

impl fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentTarget::Issue { pr } => write!(f, "pull {}", pr),
            CommentTarget::Commit { sha } => write!(f, "commit {}", sha.short()),
        }
    }
}

/// A comment returned by the host, in the order the host lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    pub id: CommentId,
    /// Login of the comment author.
    pub author: String,
    pub body: String,
}

impl CommentData {
    pub fn new(
        id: impl Into<CommentId>,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        CommentData {
            id: id.into(),
            author: author.into(),
            body: body.into(),
        }
    }
}
