//! CI Reporter - reports CI job outcomes onto GitHub pull requests and commits.
//!
//! For each job the reporter sets a commit status, and for each review unit it
//! keeps a single failure report comment that is rebuilt from the comment
//! history on every run.

pub mod comment;
pub mod config;
pub mod github;
pub mod report;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use config::ReporterConfig;
pub use report::{ReportError, Reporter};
