//! Local validation command

use super::Context;
use anyhow::Result;
use routeplan_cli::output::{format_count, Status};
use routeplan_core::ingest::load_file;
use serde_json::json;
use std::path::Path;

/// Parse and validate `file` without contacting the service
pub fn run(ctx: &Context, file: &Path) -> Result<()> {
    let points = load_file(file)?;

    if ctx.is_json() {
        ctx.print_json(&json!({
            "file": file.display().to_string(),
            "is_valid": true,
            "rows": points.len(),
            "delivery_points": points,
        }))?;
    } else {
        Status::success(&format!(
            "{}: {} valid",
            file.display(),
            format_count(points.len(), "delivery point", "delivery points")
        ));
    }
    Ok(())
}
