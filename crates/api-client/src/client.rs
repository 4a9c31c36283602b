//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{HealthApi, RoutesApi, SampleApi, UploadApi};
use crate::error::{ApiError, ApiResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Route service client
///
/// Wraps `reqwest` with a fixed timeout and request correlation IDs.
/// Requests are never retried.
#[derive(Clone)]
pub struct RouteplanClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl RouteplanClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent contains invalid header characters"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the health endpoint
    #[must_use]
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    /// Access the sample data endpoint
    #[must_use]
    pub fn sample(&self) -> SampleApi {
        SampleApi::new(self.clone())
    }

    /// Access the upload endpoint
    #[must_use]
    pub fn upload(&self) -> UploadApi {
        UploadApi::new(self.clone())
    }

    /// Access the route generation endpoint
    #[must_use]
    pub fn routes(&self) -> RoutesApi {
        RoutesApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let request = self.request_builder(Method::GET, path);
        self.execute(path, request).await
    }

    /// Perform a POST request with a JSON body
    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.request_builder(Method::POST, path).json(body);
        self.execute(path, request).await
    }

    /// Perform a POST request with a multipart form body
    #[instrument(skip(self, form))]
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ApiResult<T> {
        let request = self.request_builder(Method::POST, path).multipart(form);
        self.execute(path, request).await
    }

    /// Perform a GET request and report how long it took
    pub async fn timed_get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<(T, Duration)> {
        let start = Instant::now();
        let result = self.get(path).await?;
        Ok((result, start.elapsed()))
    }

    /// Build a request builder for custom requests
    pub fn request_builder(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.request(method, self.config.endpoint(path))
    }

    /// Send one request and decode its JSON body
    async fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let result = request.header(X_REQUEST_ID, &request_id).send().await;
        let elapsed = start.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    request_id = %request_id,
                    path = %path,
                    elapsed_ms = elapsed.as_millis(),
                    error = %e,
                    "Request failed"
                );
                return Err(if e.is_timeout() {
                    ApiError::Timeout(self.config.timeout)
                } else {
                    ApiError::Request(e)
                });
            }
        };

        debug!(
            request_id = %request_id,
            path = %path,
            status = response.status().as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );
        self.handle_response(&request_id, path, response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(
        &self,
        request_id: &str,
        path: &str,
        response: Response,
    ) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| {
                warn!(request_id = %request_id, path = %path, error = %e, "Undecodable response");
                ApiError::Decode {
                    endpoint: path.to_string(),
                    reason: e.to_string(),
                }
            })
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(
                request_id = %request_id,
                path = %path,
                status = status.as_u16(),
                body = %message,
                "Service returned an error"
            );
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}
