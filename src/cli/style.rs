//! Terminal styling helpers

use indicatif::ProgressStyle;
use merge_when_green::types::PullRequest;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;
use supports_hyperlinks::Stream as LinkStream;
use terminal_link::Link;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Semantic colors for CLI output; no-ops when stdout has no color support
pub trait Stylize {
    /// De-emphasized text
    fn muted(&self) -> String;
    /// Bold text
    fn emphasis(&self) -> String;
    /// Highlighted identifiers (branches, PR numbers)
    fn accent(&self) -> String;
    /// Positive outcome
    fn success(&self) -> String;
    /// Negative or cautionary outcome
    fn warn(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }
}

/// Styled check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner style shared by all commands
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// `#123`, hyperlinked to the PR when the terminal supports it
pub fn pr_link(pr: &PullRequest) -> String {
    let text = format!("#{}", pr.number);
    if !pr.html_url.is_empty() && supports_hyperlinks::on(LinkStream::Stdout) {
        Link::new(&text, &pr.html_url).to_string()
    } else {
        text
    }
}
