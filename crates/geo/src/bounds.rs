//! Bounding boxes over point collections.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// Axis-aligned latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Southern edge
    pub min_lat: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Western edge
    pub min_lng: f64,
    /// Eastern edge
    pub max_lng: f64,
}

impl Bounds {
    /// Center of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Returns true if the box covers no area.
    pub fn is_degenerate(&self) -> bool {
        self.min_lat == self.max_lat || self.min_lng == self.max_lng
    }

    /// Returns true if `coord` lies inside or on the edge of the box.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.latitude)
            && (self.min_lng..=self.max_lng).contains(&coord.longitude)
    }

    /// GeoJSON `bbox` ordering: west, south, east, north.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

/// Computes the bounding box of `points`.
///
/// An empty collection yields the zero box instead of failing.
pub fn calculate_bounds<I>(points: I) -> Bounds
where
    I: IntoIterator<Item = Coordinate>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Bounds::default();
    };

    iter.fold(
        Bounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        },
        |b, c| Bounds {
            min_lat: b.min_lat.min(c.latitude),
            max_lat: b.max_lat.max(c.latitude),
            min_lng: b.min_lng.min(c.longitude),
            max_lng: b.max_lng.max(c.longitude),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero_box() {
        let bounds = calculate_bounds(std::iter::empty::<Coordinate>());
        assert_eq!(bounds, Bounds::default());
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn test_single_point() {
        let bounds = calculate_bounds([Coordinate::new(40.0, -74.0)]);
        assert_eq!(bounds.min_lat, 40.0);
        assert_eq!(bounds.max_lat, 40.0);
        assert_eq!(bounds.min_lng, -74.0);
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn test_multiple_points() {
        let points = vec![
            Coordinate::new(40.7128, -74.0060),
            Coordinate::new(34.0522, -118.2437),
            Coordinate::new(41.8781, -87.6298),
        ];
        let bounds = calculate_bounds(points.iter().copied());

        assert_eq!(bounds.min_lat, 34.0522);
        assert_eq!(bounds.max_lat, 41.8781);
        assert_eq!(bounds.min_lng, -118.2437);
        assert_eq!(bounds.max_lng, -74.0060);
        assert!(points.iter().all(|p| bounds.contains(p)));
    }

    #[test]
    fn test_center_and_bbox() {
        let bounds = calculate_bounds([Coordinate::new(10.0, 20.0), Coordinate::new(20.0, 40.0)]);
        assert_eq!(bounds.center(), Coordinate::new(15.0, 30.0));
        assert_eq!(bounds.to_bbox(), [20.0, 10.0, 40.0, 20.0]);
    }
}
