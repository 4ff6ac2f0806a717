//! Main error type for the quantity surveyor.

use std::time::Duration;
use thiserror::Error;
use super::categories::*;

/// Result type alias for surveyor operations.
pub type SurveyorResult<T> = Result<T, SurveyorError>;

/// Top-level error type for the Gemini client and the report writers.
///
/// Response parsing and quantity normalization never surface through this type;
/// they degrade to a placeholder result instead.
#[derive(Error, Debug, Clone)]
pub enum SurveyorError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl SurveyorError {
    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SurveyorError::RateLimit(_)
                | SurveyorError::Network(NetworkError::Timeout { .. })
                | SurveyorError::Network(NetworkError::ConnectionFailed { .. })
                | SurveyorError::Server(ServerError::ServiceUnavailable { .. })
                | SurveyorError::Server(ServerError::ModelOverloaded { .. })
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SurveyorError::RateLimit(e) => e.retry_after(),
            SurveyorError::Server(ServerError::ServiceUnavailable { retry_after }) => *retry_after,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SurveyorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SurveyorError::Network(NetworkError::Timeout {
                duration: Duration::from_secs(0), // actual duration unknown
            })
        } else {
            SurveyorError::Network(NetworkError::ConnectionFailed {
                message: err.to_string(),
            })
        }
    }
}

impl From<serde_json::Error> for SurveyorError {
    fn from(err: serde_json::Error) -> Self {
        SurveyorError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for SurveyorError {
    fn from(err: url::ParseError) -> Self {
        SurveyorError::Configuration(ConfigurationError::InvalidBaseUrl {
            url: err.to_string(),
        })
    }
}

impl From<csv::Error> for SurveyorError {
    fn from(err: csv::Error) -> Self {
        SurveyorError::Report(ReportError::Csv {
            message: err.to_string(),
        })
    }
}
