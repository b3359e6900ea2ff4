//! GitHub implementation of the reporter's host capabilities.
//!
//! Key features:
//! - Paged listing of pull and commit comments
//! - Commit comments are edited and deleted through their own endpoints
//! - Distinguishes transient vs permanent errors, without retrying

mod client;
mod error;

pub use client::OctocrabClient;
pub use error::{GitHubApiError, GitHubErrorKind};
