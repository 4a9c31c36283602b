//! Coordinate range errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoError>;

/// A coordinate half that cannot be placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
