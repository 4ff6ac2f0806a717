//! HTTP response parser for the Gemini API.
//!
//! Deserializes successful bodies and maps error responses to
//! `SurveyorError`, filling in retry-after hints from the headers.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{map_http_status_with_body, RateLimitError, ServerError, SurveyorError};
use super::http::HttpResponse;

/// Parser for HTTP responses from the Gemini API.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a 2xx response into the expected type, or maps the error.
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, SurveyorError> {
        if response.is_success() {
            Ok(serde_json::from_slice(&response.body)?)
        } else {
            Err(Self::parse_error_response(&response))
        }
    }

    /// Checks the status of a response whose body is not needed.
    pub fn check_status(response: &HttpResponse) -> Result<(), SurveyorError> {
        if response.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error_response(response))
        }
    }

    /// Maps an error response, including `Retry-After`, to a `SurveyorError`.
    pub fn parse_error_response(response: &HttpResponse) -> SurveyorError {
        let retry_after = Self::parse_retry_after(&response.headers);
        let mut error = map_http_status_with_body(response.status, &response.body);

        match &mut error {
            SurveyorError::RateLimit(
                RateLimitError::TooManyRequests { retry_after: ra }
                | RateLimitError::QuotaExceeded { retry_after: ra },
            )
            | SurveyorError::Server(ServerError::ServiceUnavailable { retry_after: ra }) => {
                *ra = retry_after;
            }
            _ => {}
        }

        if let Some(id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(
                request_id = %id,
                status = response.status,
                error = %error,
                "API error occurred"
            );
        }

        error
    }

    /// Parses a `Retry-After` header given in seconds.
    pub fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("retry-after"))
            .and_then(|(_, value)| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Extracts the request ID from response headers for debugging.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        const REQUEST_ID_HEADERS: [&str; 3] = ["x-request-id", "x-goog-request-id", "request-id"];

        headers
            .iter()
            .find(|(key, _)| {
                REQUEST_ID_HEADERS
                    .iter()
                    .any(|h| key.eq_ignore_ascii_case(h))
            })
            .map(|(_, value)| value.clone())
    }
}
