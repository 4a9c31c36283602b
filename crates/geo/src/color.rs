//! Route color assignment.

/// Fixed palette used to tell routes apart on the map and in tables.
pub const ROUTE_COLORS: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
];

/// Returns the palette color for the route at `index`.
///
/// The assignment is stable across calls and wraps every eight routes.
#[inline]
pub fn route_color(index: usize) -> &'static str {
    ROUTE_COLORS[index % ROUTE_COLORS.len()]
}
