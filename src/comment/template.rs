//! Caller-supplied report templates.
//!
//! A report template is a MiniJinja template rendered against the first job of
//! the batch; its output is appended below the failure table. Undefined
//! variables are errors, so a template that names a field the job does not
//! have fails instead of silently rendering nothing.

use minijinja::{Environment, UndefinedBehavior};
use thiserror::Error;

use crate::types::JobResult;

/// Errors from compiling or executing a report template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template source does not compile.
    #[error("invalid report template: {0}")]
    Invalid(#[source] minijinja::Error),

    /// The template failed while rendering.
    #[error("executing report template: {0}")]
    Execute(#[source] minijinja::Error),
}

/// A compiled-on-demand report template.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    source: String,
}

impl ReportTemplate {
    /// Creates a template, checking that it compiles.
    pub fn new(source: impl Into<String>) -> Result<Self, RenderError> {
        let source = source.into();
        environment()
            .template_from_str(&source)
            .map_err(RenderError::Invalid)?;
        Ok(ReportTemplate { source })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template with the job's fields as top-level variables.
    pub fn render(&self, job: &JobResult) -> Result<String, RenderError> {
        let env = environment();
        let template = env
            .template_from_str(&self.source)
            .map_err(RenderError::Invalid)?;
        template.render(job).map_err(RenderError::Execute)
    }
}

fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}
