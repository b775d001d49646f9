//! `herald publish`

use std::sync::Arc;

use anyhow::{Context, Result};
use herald_config::HeraldConfig;
use herald_core::{
    DraftOutcome, NaturalDateParser, PublishRunner, Publisher, RunOptions, RunReport, StepOutcome,
};
use herald_github::GitHubContext;

/// Build the runner from configuration
///
/// Errors here are configuration problems: missing credentials or an
/// unusable API endpoint.
pub fn runner(config: &HeraldConfig) -> Result<PublishRunner> {
    let credentials = config
        .credentials()
        .context("Failed to resolve credentials")?;
    let context = GitHubContext::from_credentials(&config.github, &credentials)
        .context("Failed to create GitHub client")?;

    let publisher = Publisher::new(context, config.run.dry_run);
    Ok(PublishRunner::new(
        publisher,
        Arc::new(NaturalDateParser::new()),
        RunOptions::from(&config.run),
    ))
}

/// Run the publisher and print a summary
pub async fn execute(runner: &PublishRunner) -> Result<RunReport> {
    let report = runner.run().await.context("Failed to collect drafts")?;

    println!("{}", report);
    for (path, outcome) in report.failures() {
        println!("  ✗ {}: {}", path.display(), describe(outcome));
    }

    Ok(report)
}

fn describe(outcome: &DraftOutcome) -> String {
    match outcome {
        DraftOutcome::Invalid(message) | DraftOutcome::Failed(message) => message.clone(),
        DraftOutcome::Published(outcome) => [("labels", &outcome.labels), ("delete", &outcome.deletion)]
            .into_iter()
            .filter_map(|(step, result)| match result {
                StepOutcome::Failed(message) => Some(format!("{step}: {message}")),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("; "),
        DraftOutcome::SkippedFuture(date) => format!("scheduled for {date}"),
        DraftOutcome::AlreadyPublished(publication) => {
            format!("already published at {}", publication.display_url())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::PublishOutcome;

    #[test]
    fn test_describe_partial_failure() {
        let outcome = DraftOutcome::Published(PublishOutcome {
            publication: None,
            labels: StepOutcome::Done,
            deletion: StepOutcome::Failed("failed to delete draft post.md".to_string()),
        });
        assert_eq!(describe(&outcome), "delete: failed to delete draft post.md");
    }

    #[test]
    fn test_runner_requires_discussion_token() {
        let err = runner(&HeraldConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to resolve credentials"));
    }
}
