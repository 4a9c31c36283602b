//! Status lines and small formatting helpers.
//!
//! Progress and results go to stdout; warnings, errors and error details go to
//! stderr so `--format json` output stays parseable. Symbols are only colored
//! when the target stream supports it (this also honors `NO_COLOR`).

use owo_colors::{OwoColorize, Stream};
use std::time::Duration;

/// Status message helpers
pub struct Status;

impl Status {
    /// A step that completed
    pub fn success(message: &str) {
        println!("{} {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()), message);
    }

    /// A failure; the command is about to exit
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".if_supports_color(Stream::Stderr, |s| s.red()), message);
    }

    /// Something worth noticing that does not stop the command
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".if_supports_color(Stream::Stderr, |s| s.yellow()), message);
    }

    /// Neutral information
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".if_supports_color(Stream::Stdout, |s| s.blue()), message);
    }

    /// `[2/3] Generating routes`
    pub fn step(step: usize, total: usize, message: &str) {
        let counter = format!("[{step}/{total}]");
        println!("{} {}", counter.if_supports_color(Stream::Stdout, |s| s.dimmed()), message);
    }

    /// Indented line under the previous error or warning
    pub fn detail(message: &str) {
        eprintln!("  {} {}", "·".if_supports_color(Stream::Stderr, |s| s.dimmed()), message);
    }

    /// Bold title with an underline of matching width
    pub fn header(message: &str) {
        println!();
        println!("{}", message.if_supports_color(Stream::Stdout, |s| s.bold()));
        println!("{}", underline(message));
    }
}

fn underline(title: &str) -> String {
    "─".repeat(title.chars().count())
}

/// Elapsed time for a service call: `850ms`, `4.2s`, `2m 5s`.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        return format!("{millis}ms");
    }
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let whole = duration.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// `1 route`, `3 routes`
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}
