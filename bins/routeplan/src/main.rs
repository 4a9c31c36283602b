//! routeplan - delivery route planning client
//!
//! Loads delivery points from CSV/JSON (or the sample set), sends them with
//! routing constraints to the optimization service and renders the plan.

use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use routeplan_api_client::config::{API_URL_ENV, DEFAULT_API_URL, TIMEOUT_ENV};
use routeplan_cli::output::Status;
use routeplan_core::error::exit_codes;
use routeplan_telemetry::TelemetryConfig;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::generate::GenerateArgs;
use commands::{generate, health, sample, validate, Context};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Delivery route planning client
#[derive(Parser)]
#[command(name = "routeplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Route service base URL
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = TIMEOUT_ENV, default_value_t = 120)]
    timeout: u64,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable colored output (also honors NO_COLOR)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the route service is reachable
    Health,

    /// Show the sample delivery points
    Sample {
        /// Use the built-in sample instead of asking the service
        #[arg(long)]
        offline: bool,
    },

    /// Parse and validate a delivery file without contacting the service
    Validate {
        /// CSV or JSON file
        file: PathBuf,
    },

    /// Generate routes for a delivery file or the sample set
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = TelemetryConfig::for_verbosity(cli.verbose).with_json(cli.log_json);
    if let Err(e) = routeplan_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let color_disabled = color_disabled(cli.no_color, std::env::var_os("NO_COLOR").as_deref());
    if color_disabled {
        owo_colors::set_override(false);
    }

    let ctx = Context {
        format: cli.format,
        api_url: cli.api_url,
        timeout_secs: cli.timeout,
        color: !color_disabled && std::io::stdout().is_terminal(),
    };

    let result = match cli.command {
        Commands::Health => health::run(&ctx).await,
        Commands::Sample { offline } => sample::run(&ctx, offline).await,
        Commands::Validate { file } => validate::run(&ctx, &file),
        Commands::Generate(args) => generate::run(&ctx, args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&ctx, &e),
    }
}

/// `--no-color`, or a non-empty `NO_COLOR`, turns color off everywhere.
fn color_disabled(flag: bool, no_color_env: Option<&std::ffi::OsStr>) -> bool {
    flag || no_color_env.is_some_and(|v| !v.is_empty())
}

/// Print a failure and pick the exit code.
fn report(ctx: &Context, err: &anyhow::Error) -> ExitCode {
    let Some(core) = err.downcast_ref::<routeplan_core::Error>() else {
        tracing::debug!(error = ?err, "Command failed");
        match ctx.format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "error": { "message": err.to_string() } })),
            OutputFormat::Text => Status::error(&err.to_string()),
        }
        return ExitCode::from(exit_codes::FAILURE as u8);
    };

    tracing::debug!(code = %core.code, error = ?core, "Command failed");
    match ctx.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "error": core.to_report() }));
        }
        OutputFormat::Text => {
            Status::error(&format!("{} [{}]", core.user_message(), core.code));
            for detail in &core.details {
                Status::detail(detail);
            }
            if let Some(context) = &core.context {
                Status::detail(context);
            }
        }
    }
    ExitCode::from(u8::try_from(core.exit_code()).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_color_disabled_by_flag_or_env() {
        assert!(!color_disabled(false, None));
        assert!(color_disabled(true, None));
        assert!(color_disabled(false, Some(OsStr::new("1"))));
        assert!(!color_disabled(false, Some(OsStr::new(""))));
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "routeplan",
            "--no-color",
            "--format",
            "json",
            "validate",
            "deliveries.csv",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }
}
