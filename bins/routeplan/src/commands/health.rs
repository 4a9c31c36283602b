//! Health check command

use super::Context;
use anyhow::Result;
use routeplan_cli::output::{format_duration, Status};
use routeplan_cli::progress::{finish_error, finish_success};
use routeplan_core::{Error, ErrorCode};
use serde_json::json;

/// Check the route service and report its status
pub async fn run(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let spinner = ctx.spinner(&format!("Checking {}", client.base_url()));

    let (health, elapsed) = match client.health().check_timed().await {
        Ok(checked) => checked,
        Err(e) => {
            finish_error(&spinner, "Route service unreachable");
            return Err(Error::from(e).into());
        }
    };
    let healthy = health.is_healthy();

    if !healthy {
        finish_error(&spinner, "Route service degraded");
        // Reported once by the caller, in text or JSON.
        let details = health.extra.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        return Err(Error::new(
            ErrorCode::ServiceUnavailable,
            format!("Route service reports status '{}'", health.status),
        )
        .with_context(format!("Checked {} in {}", client.base_url(), format_duration(elapsed)))
        .with_details(details)
        .into());
    }

    if ctx.is_json() {
        ctx.print_json(&json!({
            "url": client.base_url(),
            "status": health.status,
            "healthy": true,
            "elapsed_ms": elapsed.as_millis() as u64,
            "details": health.extra,
        }))?;
    } else {
        finish_success(&spinner, "Route service reachable");
        Status::success(&format!(
            "{} is {} ({})",
            client.base_url(),
            health.status,
            format_duration(elapsed)
        ));
        for (key, value) in &health.extra {
            Status::detail(&format!("{key}: {value}"));
        }
    }
    Ok(())
}
