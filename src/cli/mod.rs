//! CLI command implementations

pub mod auth;
pub mod context;
pub mod event;
pub mod merge;
pub mod style;
pub mod sweep;

use anstream::println;
use async_trait::async_trait;
use context::CommandContext;
use indicatif::ProgressBar;
use merge_when_green::error::{Error, Result};
use merge_when_green::merge::{PipelineOutcome, ProgressCallback, Stage, merge_when_green};
use merge_when_green::types::PullRequest;
use std::time::Duration;
use style::{Stylize, check, pr_link, spinner_style};

/// Spinner-backed progress reporting for pipeline runs
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner labeled with the PR being evaluated
    pub fn start(pr: &PullRequest) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(format!("Evaluating PR {}...", pr_link(pr)));
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Remove the spinner from the terminal
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_stage(&self, stage: Stage) {
        self.spinner.set_message(format!("Checking {stage}..."));
    }

    async fn on_message(&self, message: &str) {
        self.spinner.println(format!("  {}", message.muted()));
    }
}

/// Print the verdict for one PR
pub fn report_outcome(pr: &PullRequest, outcome: &PipelineOutcome) {
    let title = pr.title.emphasis();
    match outcome {
        PipelineOutcome::Merged {
            sha,
            deleted_branch,
        } => {
            println!("{} Merged PR {}: {title}", check(), pr_link(pr).accent());
            if let Some(sha) = sha {
                println!("   Commit: {}", sha.muted());
            }
            if let Some(branch) = deleted_branch {
                println!("   Deleted branch {}", branch.accent());
            }
        }
        PipelineOutcome::Ready => {
            println!(
                "{} PR {}: {title} is ready to merge",
                check(),
                pr_link(pr).accent()
            );
        }
        PipelineOutcome::Skipped { stage, reasons } => {
            println!(
                "{} PR {}: {title} (stopped at {stage})",
                "✗ Skipped".warn(),
                pr_link(pr).accent()
            );
            for reason in reasons {
                println!("    - {}", reason.to_string().muted());
            }
        }
    }
}

/// Evaluate one PR with a spinner and print the verdict
pub async fn evaluate(ctx: &CommandContext, pr: &PullRequest, dry_run: bool) -> Result<PipelineOutcome> {
    let progress = CliProgress::start(pr);
    let result = merge_when_green(
        ctx.platform.as_ref(),
        pr,
        &ctx.pipeline_options(dry_run),
        &progress,
    )
    .await;
    progress.finish();

    let outcome = result?;
    report_outcome(pr, &outcome);
    Ok(outcome)
}

/// Evaluate several PRs one after another
///
/// A failure on one PR is reported and does not stop the others; the batch
/// fails at the end if any PR failed.
pub async fn evaluate_batch(ctx: &CommandContext, prs: &[PullRequest], dry_run: bool) -> Result<()> {
    if prs.is_empty() {
        println!("{}", "No pull requests to evaluate.".muted());
        return Ok(());
    }

    let mut merged = 0usize;
    let mut ready = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for pr in prs {
        match evaluate(ctx, pr, dry_run).await {
            Ok(PipelineOutcome::Merged { .. }) => merged += 1,
            Ok(PipelineOutcome::Ready) => ready += 1,
            Ok(PipelineOutcome::Skipped { .. }) => skipped += 1,
            Err(e) => {
                failed += 1;
                println!("{} PR {}: {e}", "✗ Failed".warn(), pr_link(pr).accent());
            }
        }
    }

    println!();
    if dry_run {
        println!("{} ready, {skipped} skipped, {failed} failed", ready.to_string().success());
    } else {
        println!("{} merged, {skipped} skipped, {failed} failed", merged.to_string().success());
    }

    if failed > 0 {
        return Err(Error::Internal(format!("{failed} pull request(s) failed")));
    }
    Ok(())
}
