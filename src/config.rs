//! Reporter configuration.

use tracing::warn;

use crate::types::JobKind;

/// Text shown in the collapsed details section of every report comment.
pub const DEFAULT_ABOUT: &str = "Instructions for interacting with me using pull request comments are \
available in the repository's contributing guide. If you have questions or suggestions related to my \
behavior, please file an issue against the CI configuration repository.";

/// Which jobs report, and the fixed parts of the report comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Job kinds that set statuses and maintain report comments.
    ///
    /// Default: pre-merge jobs only.
    pub job_types_to_report: Vec<JobKind>,

    /// Body of the details section.
    pub about: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReporterConfig {
    pub fn new() -> Self {
        ReporterConfig {
            job_types_to_report: vec![JobKind::Presubmit],
            about: DEFAULT_ABOUT.to_string(),
        }
    }

    /// Creates a `ReporterConfig` from environment variables.
    ///
    /// Reads `CI_REPORTER_JOB_TYPES` (comma-separated job kinds, e.g.
    /// `presubmit,postsubmit`) and `CI_REPORTER_ABOUT`. Unset or empty
    /// variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::new();

        let job_types_to_report = std::env::var("CI_REPORTER_JOB_TYPES")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_job_types(&s))
            .unwrap_or(defaults.job_types_to_report);

        let about = std::env::var("CI_REPORTER_ABOUT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.about);

        ReporterConfig {
            job_types_to_report,
            about,
        }
    }
}

/// Parses a comma-separated list of job kinds, skipping unknown names.
pub fn parse_job_types(list: &str) -> Vec<JobKind> {
    let mut kinds = Vec::new();
    for name in list.split(',').filter(|name| !name.trim().is_empty()) {
        match name.parse::<JobKind>() {
            Ok(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "ignoring job type"),
        }
    }
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reports_presubmits_only() {
        let config = ReporterConfig::default();
        assert_eq!(config.job_types_to_report, vec![JobKind::Presubmit]);
        assert_eq!(config.about, DEFAULT_ABOUT);
    }

    #[test]
    fn parses_job_type_list() {
        assert_eq!(
            parse_job_types("presubmit, Postsubmit ,periodic"),
            vec![JobKind::Presubmit, JobKind::Postsubmit, JobKind::Periodic]
        );
    }

    #[test]
    fn skips_unknown_and_duplicate_job_types() {
        assert_eq!(
            parse_job_types("presubmit,nightly,,presubmit,batch"),
            vec![JobKind::Presubmit, JobKind::Batch]
        );
    }
}
