//! merge-when-green CLI

mod cli;

use clap::{Parser, Subcommand};
use cli::context::CommandContext;
use cli::merge::MergeOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "merge-when-green",
    version,
    about = "Merge labeled pull requests once their checks, statuses and reviews are green"
)]
struct Cli {
    /// Repository as owner/name or a GitHub remote URL
    #[arg(long, global = true, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// GitHub Enterprise host (defaults to github.com)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Local policy file used instead of the repository's .github/merge-when-green.toml
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every gate for a pull request without merging
    Check {
        /// Pull request number
        pr: u64,
    },
    /// Merge a pull request if every gate is satisfied
    Merge {
        /// Pull request number
        pr: u64,
        /// Preview the verdict and prompt before merging
        #[arg(long)]
        confirm: bool,
    },
    /// Evaluate every open pull request carrying the trigger label
    Sweep {
        /// Evaluate without merging
        #[arg(long)]
        dry_run: bool,
    },
    /// Handle a single webhook delivery
    Event {
        /// Event name, as sent in the X-GitHub-Event header
        #[arg(long)]
        name: String,
        /// JSON payload file, or - for stdin
        #[arg(long)]
        payload: PathBuf,
        /// Evaluate without merging
        #[arg(long)]
        dry_run: bool,
    },
    /// Verify GitHub credentials
    Auth,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "merge_when_green=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Cli {
        repo,
        host,
        policy,
        verbose,
        command,
    } = Cli::parse();
    init_logging(verbose);

    let context = || CommandContext::new(repo.as_deref(), host.as_deref(), policy.as_deref());

    match command {
        Commands::Check { pr } => cli::merge::run_check(&context().await?, pr).await?,
        Commands::Merge { pr, confirm } => {
            cli::merge::run_merge(&context().await?, pr, MergeOptions { confirm }).await?;
        }
        Commands::Sweep { dry_run } => cli::sweep::run_sweep(&context().await?, dry_run).await?,
        Commands::Event {
            name,
            payload,
            dry_run,
        } => cli::event::run_event(&context().await?, &name, &payload, dry_run).await?,
        Commands::Auth => cli::auth::run_auth(host.as_deref()).await?,
    }

    Ok(())
}
