//! CLI command implementations

pub mod generate;
pub mod health;
pub mod sample;
pub mod validate;

use crate::OutputFormat;
use anyhow::Result;
use indicatif::ProgressBar;
use routeplan_api_client::{ClientConfig, RouteplanClient};
use routeplan_core::Error;
use std::time::Duration;

/// Settings shared by every command.
pub struct Context {
    pub format: OutputFormat,
    pub api_url: String,
    pub timeout_secs: u64,
    pub color: bool,
}

impl Context {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    pub fn client(&self) -> Result<RouteplanClient> {
        let config = ClientConfig::default()
            .with_base_url(self.api_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs));
        RouteplanClient::with_config(config).map_err(|e| Error::from(e).into())
    }

    /// A spinner in text mode, an invisible one otherwise.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.is_json() {
            routeplan_cli::progress::hidden()
        } else {
            routeplan_cli::progress::spinner(message)
        }
    }

    /// Print a value as pretty JSON on stdout.
    pub fn print_json(&self, value: &impl serde::Serialize) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
