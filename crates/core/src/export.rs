//! Route plan export: JSON bundle, flattened CSV and a GeoJSON map layer.

use crate::error::{Error, ErrorCode, Result};
use crate::model::{Constraints, DeliveryPoint, PointIndex, Route, RouteSummary};
use chrono::{DateTime, NaiveDate, Utc};
use routeplan_geo::{calculate_bounds, format_distance, format_time, route_color};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    GeoJson,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
        }
    }
}

/// Read-only view over the current plan, built at export time.
#[derive(Debug, Clone, Copy)]
pub struct ExportBundle<'a> {
    pub routes: &'a [Route],
    pub delivery_points: &'a [DeliveryPoint],
    pub constraints: &'a Constraints,
}

/// Owned form of the JSON export, for reading one back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub generated_at: DateTime<Utc>,
    pub summary: RouteSummary,
    pub constraints: Constraints,
    pub routes: Vec<Route>,
    pub delivery_points: Vec<DeliveryPoint>,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    generated_at: DateTime<Utc>,
    summary: RouteSummary,
    constraints: &'a Constraints,
    routes: &'a [Route],
    delivery_points: &'a [DeliveryPoint],
}

#[derive(Serialize)]
struct CsvRow<'a> {
    route_number: usize,
    stop_sequence: usize,
    delivery_id: &'a str,
    customer_name: &'a str,
    address: &'a str,
    lat: Option<f64>,
    lng: Option<f64>,
    delivery_window: &'a str,
    distance_from_previous: Option<f64>,
    route_total_distance: f64,
    route_total_time: f64,
}

const UNKNOWN_CUSTOMER: &str = "Unknown";

impl<'a> ExportBundle<'a> {
    /// Bundle the current plan.
    pub fn new(
        routes: &'a [Route],
        delivery_points: &'a [DeliveryPoint],
        constraints: &'a Constraints,
    ) -> Self {
        Self {
            routes,
            delivery_points,
            constraints,
        }
    }

    /// Totals across all routes.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from_routes(self.routes)
    }

    /// Serialize the whole bundle, stamped with `generated_at`.
    pub fn to_json_at(&self, generated_at: DateTime<Utc>) -> Result<String> {
        let doc = JsonExport {
            generated_at,
            summary: self.summary(),
            constraints: self.constraints,
            routes: self.routes,
            delivery_points: self.delivery_points,
        };
        serde_json::to_string_pretty(&doc).map_err(|e| {
            Error::new(ErrorCode::SerializationFailed, "Failed to serialize JSON export")
                .with_source(e)
        })
    }

    /// Serialize the whole bundle, stamped with the current time.
    pub fn to_json(&self) -> Result<String> {
        self.to_json_at(Utc::now())
    }

    /// One row per (route, stop) with customer fields looked up by id.
    pub fn to_csv(&self) -> Result<String> {
        let index = PointIndex::new(self.delivery_points);
        let start = self.constraints.start_coordinate();
        let mut writer = csv::Writer::from_writer(Vec::new());

        for (route_idx, route) in self.routes.iter().enumerate() {
            for resolved in route.resolve(&index, start) {
                let point = resolved.point;
                writer.serialize(CsvRow {
                    route_number: route_idx + 1,
                    stop_sequence: resolved.sequence,
                    delivery_id: &resolved.stop.delivery_id,
                    customer_name: point.map_or(UNKNOWN_CUSTOMER, |p| p.customer_name.as_str()),
                    address: point.map_or("", |p| p.address.as_str()),
                    lat: point.map(|p| p.lat),
                    lng: point.map(|p| p.lng),
                    delivery_window: point
                        .and_then(|p| p.delivery_window.as_deref())
                        .unwrap_or(""),
                    distance_from_previous: resolved.leg_distance,
                    route_total_distance: route.total_distance,
                    route_total_time: route.estimated_time,
                })
                .map_err(csv_failure)?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv_failure(e.into_error().into()))?;
        String::from_utf8(bytes).map_err(|e| {
            Error::new(ErrorCode::SerializationFailed, "CSV export is not valid UTF-8").with_source(e)
        })
    }

    /// GeoJSON layer: one colored line per route and one point per delivery.
    pub fn to_geojson(&self) -> Value {
        let index = PointIndex::new(self.delivery_points);
        let bounds = calculate_bounds(self.delivery_points.iter().map(DeliveryPoint::coordinate));

        let mut stop_of: std::collections::HashMap<&str, (usize, usize)> =
            std::collections::HashMap::new();
        let mut features = Vec::new();

        for (route_idx, route) in self.routes.iter().enumerate() {
            let resolved = route.resolve(&index, self.constraints.start_coordinate());
            let coordinates: Vec<[f64; 2]> = resolved
                .iter()
                .filter_map(|r| r.point.map(|p| [p.lng, p.lat]))
                .collect();
            for r in &resolved {
                stop_of.insert(r.stop.delivery_id.as_str(), (route_idx, r.sequence));
            }

            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": coordinates },
                "properties": {
                    "route_number": route_idx + 1,
                    "color": route_color(route_idx),
                    "stops": route.stop_count(),
                    "total_distance": route.total_distance,
                    "estimated_time": route.estimated_time,
                    "distance_label": format_distance(route.total_distance),
                    "time_label": format_time(route.estimated_time),
                    "summary": route.summary,
                }
            }));
        }

        for point in self.delivery_points {
            let assignment = stop_of.get(point.id.as_str());
            features.push(json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [point.lng, point.lat] },
                "properties": {
                    "id": point.id,
                    "customer_name": point.customer_name,
                    "address": point.address,
                    "route_number": assignment.map(|(r, _)| r + 1),
                    "stop_sequence": assignment.map(|(_, s)| *s),
                    "color": assignment.map(|(r, _)| route_color(*r)),
                }
            }));
        }

        json!({
            "type": "FeatureCollection",
            "bbox": bounds.to_bbox(),
            "features": features,
        })
    }

    /// Render the bundle in `format`.
    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::GeoJson => serde_json::to_string_pretty(&self.to_geojson()).map_err(|e| {
                Error::new(ErrorCode::SerializationFailed, "Failed to serialize GeoJSON export")
                    .with_source(e)
            }),
        }
    }

    /// Write `routes_<date>.<ext>` into `dir` and return its path.
    pub fn write_to_dir(&self, format: ExportFormat, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir
            .as_ref()
            .join(export_file_name(format, Utc::now().date_naive()));
        self.write_to_file(format, &path)?;
        Ok(path)
    }

    /// Write the rendered bundle to `path`.
    pub fn write_to_file(&self, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = self.render(format)?;
        std::fs::write(path, contents).map_err(|e| {
            Error::new(
                ErrorCode::WriteFailed,
                format!("Failed to write export to {}", path.display()),
            )
            .with_source(e)
        })?;
        info!(path = %path.display(), format = format.extension(), "Exported routes");
        Ok(())
    }
}

/// `routes_<YYYY-MM-DD>.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("routes_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

fn csv_failure(err: csv::Error) -> Error {
    Error::new(ErrorCode::SerializationFailed, "Failed to write CSV export").with_source(err)
}
