//! Check and merge commands for a single pull request

use crate::cli::context::CommandContext;
use crate::cli::evaluate;
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use merge_when_green::error::{Error, Result};
use merge_when_green::merge::PipelineOutcome;
use merge_when_green::types::PullRequest;
use std::time::Duration;

/// Options for the merge command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Preview the verdict and prompt for confirmation before merging
    pub confirm: bool,
}

async fn fetch_pr(ctx: &CommandContext, pr_number: u64) -> Result<PullRequest> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Fetching PR #{pr_number} from {}...",
        ctx.platform.config().to_string().emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let pr = ctx.platform.get_pull_request(pr_number).await;
    match &pr {
        Ok(_) => spinner.finish_and_clear(),
        Err(_) => spinner.abandon(),
    }
    pr
}

/// Run the check command: evaluate every gate, never merge
pub async fn run_check(ctx: &CommandContext, pr_number: u64) -> Result<()> {
    let pr = fetch_pr(ctx, pr_number).await?;
    evaluate(ctx, &pr, true).await?;
    Ok(())
}

/// Run the merge command
pub async fn run_merge(ctx: &CommandContext, pr_number: u64, options: MergeOptions) -> Result<()> {
    let pr = fetch_pr(ctx, pr_number).await?;

    if options.confirm {
        let preview = evaluate(ctx, &pr, true).await?;
        if preview != PipelineOutcome::Ready {
            return Ok(());
        }

        let prompt = if pr.cross_repository {
            format!("Merge PR #{pr_number}?")
        } else {
            format!("Merge PR #{pr_number} and delete {}?", pr.head_ref)
        };
        if !Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let outcome = evaluate(ctx, &pr, false).await?;
    if outcome.is_merged() {
        println!();
        println!("{} Done", check());
    }
    Ok(())
}
