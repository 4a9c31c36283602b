//! Sample data endpoint

use super::DataEnvelope;
use crate::client::RouteplanClient;
use crate::error::ApiResult;
use routeplan_core::model::DeliveryPoint;
use tracing::debug;

/// Sample data API interface
#[derive(Clone)]
pub struct SampleApi {
    client: RouteplanClient,
}

impl SampleApi {
    pub(crate) fn new(client: RouteplanClient) -> Self {
        Self { client }
    }

    /// GET /get-sample-data
    pub async fn fetch(&self) -> ApiResult<Vec<DeliveryPoint>> {
        let envelope: DataEnvelope = self.client.get("get-sample-data").await?;
        debug!(points = envelope.data.len(), "Fetched sample data");
        Ok(envelope.data)
    }
}
