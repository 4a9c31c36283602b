//! Route generation command

use super::Context;
use anyhow::Result;
use clap::{ArgGroup, Args};
use routeplan_api_client::RouteplanClient;
use routeplan_cli::output::{format_count, Status};
use routeplan_cli::progress::{finish_error, finish_success};
use routeplan_cli::table::routes_report;
use routeplan_core::export::ExportFormat;
use routeplan_core::model::ConstraintUpdate;
use routeplan_core::sample::sample_delivery_points;
use routeplan_core::Error;
use routeplan_session::Session;
use std::path::PathBuf;

/// Arguments for `routeplan generate`
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "sample", "builtin_sample"])))]
pub struct GenerateArgs {
    /// CSV or JSON delivery file
    pub file: Option<PathBuf>,

    /// Use the service's sample data
    #[arg(long)]
    pub sample: bool,

    /// Use the built-in sample data
    #[arg(long)]
    pub builtin_sample: bool,

    /// Let the service parse the file instead of parsing it locally
    #[arg(long, requires = "file")]
    pub remote_parse: bool,

    #[command(flatten)]
    pub constraints: ConstraintArgs,

    /// Write the plan as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub export_json: Option<PathBuf>,

    /// Write the plan as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub export_csv: Option<PathBuf>,

    /// Write the plan as GeoJSON to this file
    #[arg(long, value_name = "FILE")]
    pub geojson: Option<PathBuf>,
}

/// Constraint overrides; unset flags keep the defaults.
#[derive(Args, Debug, Default)]
pub struct ConstraintArgs {
    /// Maximum stops per route
    #[arg(long)]
    pub max_stops: Option<u32>,

    /// Vehicle capacity
    #[arg(long)]
    pub capacity: Option<u32>,

    /// Delivery window start (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub window_start: Option<String>,

    /// Delivery window end (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub window_end: Option<String>,

    /// Depot label
    #[arg(long)]
    pub start_location: Option<String>,

    /// Depot latitude
    #[arg(long, allow_negative_numbers = true)]
    pub start_lat: Option<f64>,

    /// Depot longitude
    #[arg(long, allow_negative_numbers = true)]
    pub start_lng: Option<f64>,
}

impl ConstraintArgs {
    /// Set flags as individual field edits, in form order.
    pub fn updates(&self) -> Vec<ConstraintUpdate> {
        let mut updates = Vec::new();
        if let Some(v) = self.max_stops {
            updates.push(ConstraintUpdate::MaxStopsPerRoute(v));
        }
        if let Some(v) = self.capacity {
            updates.push(ConstraintUpdate::VehicleCapacity(v));
        }
        if let Some(v) = &self.window_start {
            updates.push(ConstraintUpdate::DeliveryWindowStart(v.clone()));
        }
        if let Some(v) = &self.window_end {
            updates.push(ConstraintUpdate::DeliveryWindowEnd(v.clone()));
        }
        if let Some(v) = &self.start_location {
            updates.push(ConstraintUpdate::StartLocation(v.clone()));
        }
        if self.start_lat.is_some() {
            updates.push(ConstraintUpdate::StartLat(self.start_lat));
        }
        if self.start_lng.is_some() {
            updates.push(ConstraintUpdate::StartLng(self.start_lng));
        }
        updates
    }
}

const STEPS: usize = 3;

/// Load data, apply constraints, generate routes and export them
pub async fn run(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let text = !ctx.is_json();
    let mut session = Session::new(ctx.client()?);

    if text {
        Status::step(1, STEPS, "Loading delivery data");
    }
    let count = load(ctx, &mut session, &args).await?;
    if text {
        Status::success(&format!("Loaded {}", format_count(count, "delivery point", "delivery points")));
    }

    let mut check = session.state().constraint_check();
    for update in args.constraints.updates() {
        check = session.update_constraint(update);
    }
    if text {
        for warning in check.warnings() {
            Status::warning(&warning.to_string());
        }
    }
    check.to_result()?;

    if text {
        Status::step(2, STEPS, "Generating routes");
    }
    let spinner = ctx.spinner("Waiting for the route service");
    let route_count = match session.generate().await {
        Ok(routes) => routes.len(),
        Err(e) => {
            finish_error(&spinner, "Route generation failed");
            return Err(e.into());
        }
    };
    finish_success(&spinner, &format!("Generated {}", format_count(route_count, "route", "routes")));

    let bundle = session.bundle()?;
    if text {
        let state = session.state();
        Status::header("Routes");
        print!(
            "{}",
            routes_report(
                state.routes(),
                &state.point_index(),
                state.constraints().start_coordinate(),
                ctx.color,
            )
        );
    } else {
        println!("{}", bundle.to_json()?);
    }

    if text {
        Status::step(3, STEPS, "Exporting");
    }
    let mut exported = Vec::new();
    if let Some(dir) = &args.export_json {
        exported.push(session.export(ExportFormat::Json, dir)?);
    }
    if let Some(dir) = &args.export_csv {
        exported.push(session.export(ExportFormat::Csv, dir)?);
    }
    if let Some(path) = &args.geojson {
        session.export_to(ExportFormat::GeoJson, path)?;
        exported.push(path.clone());
    }
    if text {
        if exported.is_empty() {
            Status::info("Nothing to export");
        }
        for path in &exported {
            Status::success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}

async fn load(
    ctx: &Context,
    session: &mut Session<RouteplanClient>,
    args: &GenerateArgs,
) -> Result<usize, Error> {
    if args.builtin_sample {
        return session.load_points(sample_delivery_points());
    }

    let spinner = ctx.spinner("Checking route service");
    if let Err(e) = session.check_health().await {
        finish_error(&spinner, "Route service unavailable");
        return Err(e);
    }
    spinner.finish_and_clear();

    match &args.file {
        Some(path) if args.remote_parse => session.upload_file(path).await,
        Some(path) => session.load_file(path),
        None => session.load_sample().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_no_updates() {
        assert!(ConstraintArgs::default().updates().is_empty());
    }

    #[test]
    fn test_updates_follow_flags() {
        let args = ConstraintArgs {
            max_stops: Some(5),
            start_lat: Some(-33.9),
            start_location: Some("Depot".into()),
            ..Default::default()
        };
        assert_eq!(
            args.updates(),
            vec![
                ConstraintUpdate::MaxStopsPerRoute(5),
                ConstraintUpdate::StartLocation("Depot".into()),
                ConstraintUpdate::StartLat(Some(-33.9)),
            ]
        );
    }
}
