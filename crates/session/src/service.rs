//! The remote operations a session depends on.

use routeplan_api_client::RouteplanClient;
use routeplan_core::model::{Constraints, DeliveryPoint, Route};
use routeplan_core::{Error, ErrorCode, Result};
use std::future::Future;
use std::path::Path;

/// Route optimization backend.
///
/// Implemented by [`RouteplanClient`]; tests substitute an in-memory fake.
pub trait RouteService: Send + Sync {
    /// Succeeds when the service reports itself healthy.
    fn check_health(&self) -> impl Future<Output = Result<()>> + Send;

    /// Canned delivery points held by the service.
    fn fetch_sample(&self) -> impl Future<Output = Result<Vec<DeliveryPoint>>> + Send;

    /// Let the service parse a raw file.
    fn upload_file(&self, path: &Path) -> impl Future<Output = Result<Vec<DeliveryPoint>>> + Send;

    /// Plan routes for `points` under `constraints`.
    fn generate_routes(
        &self,
        points: &[DeliveryPoint],
        constraints: &Constraints,
    ) -> impl Future<Output = Result<Vec<Route>>> + Send;
}

impl RouteService for RouteplanClient {
    async fn check_health(&self) -> Result<()> {
        let health = self.health().check().await?;
        if health.is_healthy() {
            Ok(())
        } else {
            Err(Error::new(
                ErrorCode::ServiceUnavailable,
                format!("Route service reports status '{}'", health.status),
            ))
        }
    }

    async fn fetch_sample(&self) -> Result<Vec<DeliveryPoint>> {
        Ok(self.sample().fetch().await?)
    }

    async fn upload_file(&self, path: &Path) -> Result<Vec<DeliveryPoint>> {
        Ok(self.upload().file(path).await?)
    }

    async fn generate_routes(&self, points: &[DeliveryPoint], constraints: &Constraints) -> Result<Vec<Route>> {
        Ok(self.routes().generate(points, constraints).await?)
    }
}

/// Whether a failure means the service should be treated as down.
pub fn is_outage(err: &Error) -> bool {
    matches!(err.code, ErrorCode::ServiceUnavailable | ErrorCode::Timeout)
}
