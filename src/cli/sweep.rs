//! Sweep command - evaluate every open labeled pull request

use crate::cli::context::CommandContext;
use crate::cli::evaluate_batch;
use crate::cli::style::{Stylize, spinner_style};
use indicatif::ProgressBar;
use merge_when_green::MERGE_LABEL;
use merge_when_green::error::Result;
use merge_when_green::triggers::labeled_pull_requests;
use std::time::Duration;

/// Run the sweep command
pub async fn run_sweep(ctx: &CommandContext, dry_run: bool) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Finding open PRs labeled {}...",
        MERGE_LABEL.accent()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let prs = labeled_pull_requests(ctx.platform.as_ref()).await;
    spinner.finish_and_clear();

    evaluate_batch(ctx, &prs?, dry_run).await
}
