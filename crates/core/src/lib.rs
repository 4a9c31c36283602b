//! Core types and pipelines for the routeplan delivery client
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Model**: delivery points, constraints and routes
//! - **Parsing**: CSV/JSON uploads into loosely typed rows
//! - **Validation**: row checks and constraint form checks
//! - **Export**: JSON, CSV and GeoJSON route plans
//!
//! # Example
//!
//! ```rust,no_run
//! use routeplan_core::{ingest::load_file, model::RouteSummary};
//!
//! let points = load_file("deliveries.csv").expect("valid upload");
//! println!("{} deliveries", points.len());
//! # let _ = RouteSummary::from_routes(&[]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod ingest;
pub mod model;
pub mod parse;
pub mod sample;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::export::{ExportBundle, ExportFormat};
    pub use crate::ingest::{ingest_str, load_file, FileFormat};
    pub use crate::model::{
        ConstraintUpdate, Constraints, DeliveryPoint, PointIndex, Route, RouteStop, RouteSummary,
    };
    pub use crate::sample::sample_delivery_points;
    pub use crate::validation::{
        validate_constraints, validate_delivery_data, DeliveryValidation, ValidationResult,
        Validator,
    };
}
