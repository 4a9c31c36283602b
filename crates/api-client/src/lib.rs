//! HTTP client for the routeplan optimization service
//!
//! Four thin request/response operations against the route service:
//!
//! - **Health**: `GET /health`
//! - **Sample data**: `GET /get-sample-data`
//! - **Upload**: `POST /upload` (multipart, server-side parsing)
//! - **Generate routes**: `POST /generate-routes`
//!
//! Every request carries an `X-Request-ID` correlation header and a fixed
//! timeout (two minutes by default). Failures never retry; they surface as
//! an [`ApiError`] with a one-line [`ApiError::user_message`].
//!
//! # Example
//!
//! ```rust,no_run
//! use routeplan_api_client::RouteplanClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RouteplanClient::new()?;
//!
//!     let health = client.health().check().await?;
//!     println!("Service status: {}", health.status);
//!
//!     let points = client.sample().fetch().await?;
//!     println!("Got {} sample deliveries", points.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

#[cfg(test)]
mod test_support;

pub use client::RouteplanClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::RouteplanClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{HealthApi, RoutesApi, SampleApi, UploadApi};
    pub use crate::error::{ApiError, ApiResult};
}
