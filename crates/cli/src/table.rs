//! Delivery and route tables for the terminal.
//!
//! Rendering returns a `String` so callers decide where it goes; colors are
//! opt-in so piped output stays plain.

use owo_colors::OwoColorize;
use routeplan_core::model::{DeliveryPoint, PointIndex, Route, RouteSummary};
use routeplan_geo::{format_distance, format_time, route_color, Coordinate};
use std::fmt::Write;

use crate::output::format_count;

/// Column alignment
#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Fixed-column text table.
struct Table {
    headers: Vec<&'static str>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &[(&'static str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| *h).collect(),
            align: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn render(&self, indent: &str, bold_header: bool) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header = self.line(&self.headers.iter().map(|h| (*h).to_string()).collect::<Vec<_>>(), &widths);
        if bold_header {
            let _ = writeln!(out, "{indent}{}", header.bold());
        } else {
            let _ = writeln!(out, "{indent}{header}");
        }
        let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let _ = writeln!(out, "{indent}{}", "─".repeat(rule));

        for row in &self.rows {
            let _ = writeln!(out, "{indent}{}", self.line(row, &widths));
        }
        out
    }

    fn line(&self, cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .zip(&self.align)
            .map(|((cell, width), align)| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }
}

/// Split `#RRGGBB` into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn swatch(index: usize, color: bool) -> String {
    match hex_to_rgb(route_color(index)) {
        Some((r, g, b)) if color => "●".truecolor(r, g, b).to_string(),
        _ => "●".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Table of loaded delivery points.
pub fn points_table(points: &[DeliveryPoint], color: bool) -> String {
    let mut table = Table::new(&[
        ("ID", Align::Left),
        ("Customer", Align::Left),
        ("Lat", Align::Right),
        ("Lng", Align::Right),
        ("Address", Align::Left),
        ("Window", Align::Left),
        ("Priority", Align::Left),
    ]);
    for p in points {
        table.push(vec![
            p.id.clone(),
            truncate(&p.customer_name, 28),
            format!("{:.4}", p.lat),
            format!("{:.4}", p.lng),
            truncate(&p.address, 36),
            p.delivery_window.clone().unwrap_or_default(),
            p.priority.clone().unwrap_or_default(),
        ]);
    }

    let mut out = table.render("", color);
    let _ = writeln!(out, "{}", format_count(points.len(), "delivery point", "delivery points"));
    out
}

/// One line per route followed by its stops, then plan totals.
///
/// Stops whose id is not among the loaded points are shown as unknown.
pub fn routes_report(
    routes: &[Route],
    index: &PointIndex<'_>,
    start: Option<Coordinate>,
    color: bool,
) -> String {
    let mut out = String::new();

    for (i, route) in routes.iter().enumerate() {
        let title = format!("Route {}", i + 1);
        let _ = writeln!(
            out,
            "{} {}  {} · {} · {}",
            swatch(i, color),
            if color { title.bold().to_string() } else { title },
            format_count(route.stop_count(), "stop", "stops"),
            format_distance(route.total_distance),
            format_time(route.estimated_time),
        );
        if let Some(summary) = route.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(out, "  {}", if color { summary.dimmed().to_string() } else { summary.to_string() });
        }

        let mut table = Table::new(&[
            ("#", Align::Right),
            ("ID", Align::Left),
            ("Customer", Align::Left),
            ("Address", Align::Left),
            ("Window", Align::Left),
            ("Leg", Align::Right),
        ]);
        for stop in route.resolve(index, start) {
            let (customer, address, window) = match stop.point {
                Some(p) => (
                    truncate(&p.customer_name, 28),
                    truncate(&p.address, 36),
                    p.delivery_window.clone().unwrap_or_default(),
                ),
                None => ("(unknown stop)".to_string(), String::new(), String::new()),
            };
            table.push(vec![
                stop.sequence.to_string(),
                stop.stop.delivery_id.clone(),
                customer,
                address,
                window,
                stop.leg_distance.map(format_distance).unwrap_or_default(),
            ]);
        }
        out.push_str(&table.render("  ", false));
        out.push('\n');
    }

    let summary = RouteSummary::from_routes(routes);
    let _ = writeln!(
        out,
        "Total: {}, {}, {}, {}",
        format_count(summary.total_routes, "route", "routes"),
        format_count(summary.total_stops, "stop", "stops"),
        format_distance(summary.total_distance),
        format_time(summary.total_time),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeplan_core::model::RouteStop;
    use routeplan_core::sample::sample_delivery_points;

    fn routes() -> Vec<Route> {
        vec![
            Route {
                route_id: Some(1),
                stops: vec![
                    RouteStop { delivery_id: "D001".into(), distance_from_previous: None },
                    RouteStop { delivery_id: "D002".into(), distance_from_previous: Some(0.12) },
                ],
                total_distance: 1.5,
                estimated_time: 75.0,
                summary: Some("Chelsea run".into()),
            },
            Route {
                route_id: Some(2),
                stops: vec![RouteStop { delivery_id: "ghost".into(), distance_from_previous: None }],
                total_distance: 0.5,
                estimated_time: 10.0,
                summary: None,
            },
        ]
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF6B6B"), Some((255, 107, 107)));
        assert_eq!(hex_to_rgb("#4ecdc4"), Some((78, 205, 196)));
        assert_eq!(hex_to_rgb("FF6B6B"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
        assert_eq!(hex_to_rgb("#GG0000"), None);
    }

    #[test]
    fn test_palette_parses() {
        for i in 0..8 {
            assert!(hex_to_rgb(route_color(i)).is_some());
        }
    }

    #[test]
    fn test_points_table_plain() {
        let out = points_table(&sample_delivery_points()[..2], false);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with('─'));
        assert!(lines[2].starts_with("D001"));
        assert!(out.contains("Blue Bottle Cafe"));
        assert!(out.ends_with("2 delivery points\n"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_routes_report() {
        let points = sample_delivery_points();
        let index = PointIndex::new(&points);
        let out = routes_report(&routes(), &index, None, false);

        assert!(out.contains("● Route 1  2 stops · 1.50 km · 1h 15m"));
        assert!(out.contains("Chelsea run"));
        assert!(out.contains("120 m"));
        assert!(out.contains("(unknown stop)"));
        assert!(out.contains("● Route 2  1 stop · 500 m · 10 min"));
        assert!(out.ends_with("Total: 2 routes, 3 stops, 2.00 km, 1h 25m\n"));
    }

    #[test]
    fn test_colored_report_has_escapes() {
        let points = sample_delivery_points();
        let index = PointIndex::new(&points);
        let out = routes_report(&routes(), &index, None, true);
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long customer name", 8), "a very …");
    }

    #[test]
    fn test_empty_plan() {
        let index = PointIndex::new(&[]);
        assert_eq!(
            routes_report(&[], &index, None, false),
            "Total: 0 routes, 0 stops, 0 m, 0 min\n"
        );
    }
}
