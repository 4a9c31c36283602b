//! Geometry and formatting helpers for route planning.
//!
//! This crate provides:
//! - Haversine distance calculations
//! - Distance and duration formatting for display
//! - Deterministic route color assignment
//! - Bounding boxes over point collections
//! - A debouncer for rate-limiting interactive work
//!
//! # Example
//!
//! ```
//! use routeplan_geo::{format_distance, haversine_distance, Coordinate};
//!
//! let new_york = Coordinate::new(40.7128, -74.0060);
//! let los_angeles = Coordinate::new(34.0522, -118.2437);
//!
//! let distance_km = haversine_distance(&new_york, &los_angeles);
//! assert!(distance_km > 3900.0 && distance_km < 4000.0);
//! assert!(format_distance(distance_km).ends_with(" km"));
//! ```

mod bounds;
mod color;
pub mod debounce;
mod error;
mod format;
mod haversine;

pub use bounds::{calculate_bounds, Bounds};
pub use color::{route_color, ROUTE_COLORS};
pub use debounce::Debouncer;
pub use error::{GeoError, Result};
pub use format::{format_distance, format_time};
pub use haversine::{haversine_distance, haversine_distance_meters, EARTH_RADIUS_KM, EARTH_RADIUS_M};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate without range checks.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate, rejecting out-of-range or non-finite values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        if !is_valid_latitude(latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !is_valid_longitude(longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        is_valid_latitude(self.latitude) && is_valid_longitude(self.longitude)
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Returns true if `lat` lies within [-90, 90].
#[inline]
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Returns true if `lng` lies within [-180, 180].
#[inline]
pub fn is_valid_longitude(lng: f64) -> bool {
    (-180.0..=180.0).contains(&lng)
}
