//! Logging and timing for the routeplan client
//!
//! Log lines always go to stderr so command output on stdout stays clean.
//! Every line of a run can be tied together by [`session_id`], and
//! long-running service calls are measured with [`Timer`] and recorded as
//! structured [`Event`]s.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Crates whose debug output `--verbose` turns on.
const ROUTEPLAN_TARGETS: [&str; 4] = [
    "routeplan",
    "routeplan_api_client",
    "routeplan_core",
    "routeplan_session",
];

/// Shape of emitted log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging setup for one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence
    pub filter: String,
    pub format: LogFormat,
    /// Include the module path of each line
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            format: LogFormat::Compact,
            show_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Warnings only, or debug output for the routeplan crates.
    #[must_use]
    pub fn for_verbosity(verbose: bool) -> Self {
        if !verbose {
            return Self::default();
        }
        let mut filter = String::from("warn");
        for target in ROUTEPLAN_TARGETS {
            filter.push_str(&format!(",{target}=debug"));
        }
        Self {
            filter,
            show_target: true,
            ..Self::default()
        }
    }

    /// Emit JSON lines instead of compact text
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.format = if json { LogFormat::Json } else { LogFormat::Compact };
        self
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;

    let json = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
            .with_current_span(true)
    });
    let compact = (config.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Logging initialized"
    );
    Ok(())
}

/// Random id shared by every log line of this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Measures one named operation; [`Timer::stop`] logs the result.
pub struct Timer {
    operation: &'static str,
    started: Instant,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        tracing::debug!(operation, "Started");
        Self {
            operation,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            operation = self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "Finished"
        );
        elapsed
    }
}

/// Something that happened in a session, e.g. data loaded or routes generated
#[derive(Debug, Serialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub session_id: &'static str,
    pub kind: &'static str,
    pub data: serde_json::Value,
}

impl Event {
    pub fn new(kind: &'static str, data: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            session_id: session_id(),
            kind,
            data,
        }
    }

    /// Record at info level with `data` as a JSON field
    pub fn log(&self) {
        tracing::info!(
            session_id = self.session_id,
            kind = self.kind,
            data = %self.data,
            "{}",
            self.kind
        );
    }
}
