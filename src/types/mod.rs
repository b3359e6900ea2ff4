//! Core domain types for the reporter.

pub mod comment;
pub mod ids;
pub mod job;

pub use comment::{CommentData, CommentTarget};
pub use ids::{CommentId, PrNumber, RepoId, Sha};
pub use job::{JobKind, JobResult, JobState, Pull, ReviewUnit, UnknownState};
