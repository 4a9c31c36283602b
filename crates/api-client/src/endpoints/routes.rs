//! Route generation endpoint

use crate::client::RouteplanClient;
use crate::error::ApiResult;
use routeplan_core::model::{Constraints, DeliveryPoint, Route};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Route generation API interface
#[derive(Clone)]
pub struct RoutesApi {
    client: RouteplanClient,
}

/// Request body for route generation
#[derive(Debug, Serialize)]
pub struct GenerateRoutesRequest<'a> {
    /// Points to route
    pub delivery_points: &'a [DeliveryPoint],
    /// Generation limits
    pub constraints: &'a Constraints,
}

/// Response body for route generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRoutesResponse {
    /// Generated routes; absent means none
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl RoutesApi {
    pub(crate) fn new(client: RouteplanClient) -> Self {
        Self { client }
    }

    /// POST /generate-routes
    pub async fn generate(
        &self,
        delivery_points: &[DeliveryPoint],
        constraints: &Constraints,
    ) -> ApiResult<Vec<Route>> {
        let body = GenerateRoutesRequest {
            delivery_points,
            constraints,
        };
        let response: GenerateRoutesResponse = self.client.post("generate-routes", &body).await?;
        info!(
            points = delivery_points.len(),
            routes = response.routes.len(),
            "Generated routes"
        );
        Ok(response.routes)
    }
}
