//! Health check endpoint

use crate::client::RouteplanClient;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Health check API interface
#[derive(Clone)]
pub struct HealthApi {
    client: RouteplanClient,
}

impl HealthApi {
    /// Create a new health API interface
    pub(crate) fn new(client: RouteplanClient) -> Self {
        Self { client }
    }

    /// GET /health
    pub async fn check(&self) -> ApiResult<HealthResponse> {
        self.client.get("health").await
    }

    /// Check health with timing information
    pub async fn check_timed(&self) -> ApiResult<(HealthResponse, Duration)> {
        self.client.timed_get("health").await
    }
}

/// Health check response from the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy", "ok")
    pub status: String,
    /// Anything else the service reports
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    /// Whether the reported status reads as healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(
            self.status.to_ascii_lowercase().as_str(),
            "ok" | "healthy" | "up" | "pass"
        )
    }
}
