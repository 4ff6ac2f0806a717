//! Transport layer error types.

use std::time::Duration;
use crate::error::{NetworkError, SurveyorError};

/// Transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timeout")]
    Timeout,
    #[error("Request error: {0}")]
    Request(String),
}

impl From<TransportError> for SurveyorError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => SurveyorError::Network(NetworkError::Timeout {
                duration: Duration::from_secs(0),
            }),
            other => SurveyorError::Network(NetworkError::ConnectionFailed {
                message: other.to_string(),
            }),
        }
    }
}
