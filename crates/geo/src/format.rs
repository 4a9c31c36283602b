//! Display formatting for distances and durations.

/// Formats a distance given in kilometers.
///
/// Values under 1 km render as whole meters, everything else with two
/// decimals and a `km` suffix.
///
/// ```
/// use routeplan_geo::format_distance;
///
/// assert_eq!(format_distance(0.5), "500 m");
/// assert_eq!(format_distance(1.5), "1.50 km");
/// ```
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.2} km")
    }
}

/// Formats a duration given in minutes.
///
/// Durations of an hour or more render as `"Nh Mm"`, shorter ones as `"M min"`.
///
/// ```
/// use routeplan_geo::format_time;
///
/// assert_eq!(format_time(45.0), "45 min");
/// assert_eq!(format_time(90.0), "1h 30m");
/// ```
pub fn format_time(minutes: f64) -> String {
    // Round once up front so 59.6 becomes "1h 0m" rather than "60 min".
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;

    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins} min")
    }
}
