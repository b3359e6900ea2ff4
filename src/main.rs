use std::io::Read;

use anyhow::{Context, bail};
use ci_reporter::comment::ReportTemplate;
use ci_reporter::github::OctocrabClient;
use ci_reporter::types::JobResult;
use ci_reporter::{Reporter, ReporterConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reads a JSON array of job results for one review unit from stdin and
/// reports them: a status per job, then the unit's report comment.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ci_reporter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let token = std::env::var("GITHUB_TOKEN")
        .context("GITHUB_TOKEN is not set")?;
    let mut client = OctocrabClient::from_token(token)
        .context("building GitHub client")?;
    if let Ok(login) = std::env::var("CI_REPORTER_BOT_LOGIN") {
        client = client.with_bot_login(login);
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading job batch from stdin")?;
    let jobs: Vec<JobResult> = serde_json::from_str(&input).context("parsing job batch")?;
    if jobs.is_empty() {
        bail!("job batch is empty");
    }

    let cancel = CancellationToken::new();
    let mut reporter = Reporter::new(client, ReporterConfig::from_env())
        .with_cancellation(cancel.clone());
    if let Ok(source) = std::env::var("CI_REPORTER_TEMPLATE") {
        let template = ReportTemplate::new(source)
            .context("parsing report template")?;
        reporter = reporter.with_template(template);
    }
    let must_create = std::env::var("CI_REPORTER_MUST_CREATE")
        .is_ok_and(|v| v == "true" || v == "1");

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling");
            cancel.cancel();
        }
    });

    for job in &jobs {
        reporter.report_status(job).await?;
    }
    reporter.report_comment(&jobs, must_create).await?;

    tracing::info!(jobs = jobs.len(), "reported batch");
    Ok(())
}
