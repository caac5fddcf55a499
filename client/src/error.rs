//! Error types for the jobs client
use common::{JobId, ValidationError};
use thiserror::Error;

/// Failure talking to the remote collection
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network unreachable, connection refused, timeout...
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON we expected
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Failure of a job store operation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("no job with id {0}")]
    UnknownJob(JobId),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::status(503, "maintenance");
        assert_eq!(err.to_string(), "server answered 503: maintenance");
        assert!(!err.is_not_found());
        assert!(ApiError::status(404, "").is_not_found());
    }

    #[test]
    fn test_store_error_wraps_api_error_transparently() {
        let err: StoreError = ApiError::status(500, "boom").into();
        assert_eq!(err.to_string(), "server answered 500: boom");

        let err = StoreError::UnknownJob(JobId::Int(12));
        assert_eq!(err.to_string(), "no job with id 12");
    }
}
