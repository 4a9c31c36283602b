//! Error types for the API client

use routeplan_core::error::{Error as CoreError, ErrorCode};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode {
        /// Endpoint path
        endpoint: String,
        /// Decoder message
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service returned a non-2xx status
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Upload refused locally: not a `.csv` or `.json` file
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Local file could not be read for upload
    #[error("Cannot read {path}: {source}")]
    File {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Whether the service could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// One line suitable for showing to the user.
    ///
    /// Transport detail stays in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(e) if e.is_connect() => "Could not connect to the route service".to_string(),
            Self::Request(e) if e.is_timeout() => "The route service did not respond in time".to_string(),
            Self::Request(_) => "Request to the route service failed".to_string(),
            Self::Timeout(after) => {
                format!("The route service did not respond within {}s", after.as_secs())
            }
            Self::Decode { .. } => "The route service sent an unexpected response".to_string(),
            Self::Config(msg) => format!("Invalid client configuration: {msg}"),
            Self::ApiResponse { status, message } => {
                let detail = service_detail(message);
                if detail.is_empty() {
                    format!("The route service returned an error ({status})")
                } else {
                    format!("The route service returned an error ({status}): {detail}")
                }
            }
            Self::UnsupportedFormat(name) => format!("Unsupported file type: {name}"),
            Self::File { path, .. } => format!("Could not read {path}"),
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            Self::Request(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::Request(_) => ErrorCode::ServiceUnavailable,
            Self::Decode { .. } | Self::ApiResponse { .. } => ErrorCode::BadResponse,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::UnsupportedFormat(_) => ErrorCode::UnsupportedFormat,
            Self::File { .. } => ErrorCode::IoError,
        }
    }
}

/// Pull `detail` out of a FastAPI-style `{"detail": "..."}` body, else the
/// trimmed body itself.
fn service_detail(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let detail = parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("error")))
        .and_then(serde_json::Value::as_str);

    match detail {
        Some(d) => d.trim().to_string(),
        None => body.trim().chars().take(200).collect(),
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        if let ApiError::UnsupportedFormat(name) = &err {
            return CoreError::unsupported_format(name);
        }
        let suggestion = if err.is_unreachable() {
            Some("Check that the route service is running, then run a health check")
        } else {
            None
        };
        let mut converted = CoreError::new(err.code(), err.user_message());
        if let Some(s) = suggestion {
            converted = converted.with_suggestion(s);
        }
        converted.with_source(err)
    }
}
