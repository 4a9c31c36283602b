//! Endpoint-specific API implementations
//!
//! | Module | Route | Description |
//! |--------|-------|-------------|
//! | `health` | `GET /health` | Service availability |
//! | `sample` | `GET /get-sample-data` | Canned delivery points |
//! | `upload` | `POST /upload` | Server-side parsing of a raw file |
//! | `routes` | `POST /generate-routes` | Route optimization |

pub mod health;
pub mod routes;
pub mod sample;
pub mod upload;

pub use health::HealthApi;
pub use routes::RoutesApi;
pub use sample::SampleApi;
pub use upload::UploadApi;

use routeplan_core::model::DeliveryPoint;
use serde::Deserialize;

/// `{ "data": [...] }` envelope shared by sample and upload.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope {
    #[serde(default)]
    pub data: Vec<DeliveryPoint>,
}
