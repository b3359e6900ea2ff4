//! Errors returned by a reporting run.

use thiserror::Error;

use crate::comment::RenderError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a reporting run stopped.
///
/// Every error aborts the run at the point it happened; remote state is left
/// as it was and a later run converges it.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A call to the host failed.
    #[error("error {operation}: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// The report template failed; nothing was changed for that comment.
    #[error("generating comment: {0}")]
    Render(#[from] RenderError),

    #[error("no jobs to report")]
    EmptyBatch,

    /// The batch tests several pulls at once, which is not reported on.
    #[error("batch covers {pulls} pulls; only single-pull units are reported")]
    MultiPullBatch { pulls: usize },

    #[error("cancelled while {operation}")]
    Cancelled { operation: &'static str },
}

impl ReportError {
    pub fn remote(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ReportError::Remote {
            operation,
            source: Box::new(source),
        }
    }

    /// Returns the failed operation, for remote and cancellation errors.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ReportError::Remote { operation, .. } | ReportError::Cancelled { operation } => {
                Some(*operation)
            }
            _ => None,
        }
    }

    /// Returns true if the host call may succeed when repeated.
    ///
    /// Only meaningful when the client reports [`GitHubApiError`]s.
    ///
    /// [`GitHubApiError`]: crate::github::GitHubApiError
    pub fn is_retriable(&self) -> bool {
        match self {
            ReportError::Remote { source, .. } => source
                .downcast_ref::<crate::github::GitHubApiError>()
                .is_some_and(|err| err.kind.is_retriable()),
            _ => false,
        }
    }
}
