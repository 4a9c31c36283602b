//! Sample data command

use super::Context;
use anyhow::Result;
use routeplan_cli::output::Status;
use routeplan_cli::progress::{finish_error, finish_success};
use routeplan_cli::table::points_table;
use routeplan_core::sample::sample_delivery_points;
use routeplan_session::Session;

/// Print the sample delivery set, from the service or the built-in copy
pub async fn run(ctx: &Context, offline: bool) -> Result<()> {
    let points = if offline {
        sample_delivery_points()
    } else {
        let mut session = Session::new(ctx.client()?);
        let spinner = ctx.spinner("Fetching sample data");
        match session.load_sample().await {
            Ok(count) => finish_success(&spinner, &format!("Fetched {count} sample points")),
            Err(e) => {
                finish_error(&spinner, "Could not fetch sample data");
                return Err(e.into());
            }
        }
        session.state().points().to_vec()
    };

    if ctx.is_json() {
        ctx.print_json(&points)?;
    } else {
        if offline {
            Status::info("Built-in sample data");
        }
        print!("{}", points_table(&points, ctx.color));
    }
    Ok(())
}
