//! Event command - handle one webhook delivery

use crate::cli::context::CommandContext;
use crate::cli::evaluate_batch;
use crate::cli::style::Stylize;
use anstream::println;
use merge_when_green::error::Result;
use merge_when_green::triggers::{Trigger, parse_event, resolve_trigger};
use std::io::Read;
use std::path::Path;
use tracing::info;

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(path)?)
    }
}

/// Run the event command
pub async fn run_event(ctx: &CommandContext, name: &str, payload: &Path, dry_run: bool) -> Result<()> {
    let body = read_payload(payload)?;
    let trigger = parse_event(name, &body)?;

    if let Trigger::Ignored(reason) = &trigger {
        info!(event = name, reason, "ignoring event");
        println!("{}", format!("Ignored: {reason}").muted());
        return Ok(());
    }

    let prs = resolve_trigger(ctx.platform.as_ref(), &trigger).await?;
    evaluate_batch(ctx, &prs, dry_run).await
}
