//! Rejected session actions

use routeplan_core::error::{Error, ErrorCode};
use thiserror::Error as ThisError;

/// Why an action was refused in the current state.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("No delivery data loaded")]
    NoData,

    #[error("Route generation is already in progress")]
    AlreadyGenerating,

    #[error("Constraints are invalid: {}", .0.join("; "))]
    InvalidConstraints(Vec<String>),

    #[error("Route service is unavailable")]
    ServiceUnavailable,

    #[error("No routes to export")]
    NoRoutes,
}

impl SessionError {
    /// Matching core error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoData => ErrorCode::NoData,
            Self::AlreadyGenerating | Self::NoRoutes => ErrorCode::InvalidState,
            Self::InvalidConstraints(_) => ErrorCode::InvalidConstraint,
            Self::ServiceUnavailable => ErrorCode::ServiceUnavailable,
        }
    }
}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::ServiceUnavailable => Error::service_unavailable(),
            SessionError::NoData => Error::no_data()
                .with_suggestion("Upload a CSV/JSON file or load the sample data first"),
            SessionError::InvalidConstraints(ref errors) => {
                Error::new(err.code(), "Constraints are invalid").with_details(errors.clone())
            }
            SessionError::NoRoutes => Error::new(err.code(), err.to_string())
                .with_suggestion("Generate routes before exporting"),
            SessionError::AlreadyGenerating => Error::new(err.code(), err.to_string()),
        }
    }
}
