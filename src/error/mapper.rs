//! Error mapping utilities for HTTP status codes and API responses.

use serde::Deserialize;
use super::categories::*;
use super::types::SurveyorError;

/// Structured API error response from Gemini.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detailed error information from API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// Maps HTTP status codes and response body to the matching `SurveyorError`.
///
/// Retry-after values are left empty here; the transport's response parser fills
/// them in from the response headers.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> SurveyorError {
    let (message, error_details) = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(error_response) => (error_response.error.message.clone(), Some(error_response.error)),
        Err(_) => {
            let body_str = String::from_utf8_lossy(body).to_string();
            let message = serde_json::from_slice::<serde_json::Value>(body)
                .ok()
                .and_then(|json| {
                    json.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(body_str);
            (message, None)
        }
    };

    match status {
        400 => {
            let details = error_details
                .as_ref()
                .map(|e| parse_validation_details(&e.details))
                .unwrap_or_default();

            SurveyorError::Request(RequestError::ValidationError { message, details })
        }

        401 => SurveyorError::Authentication(AuthenticationError::InvalidApiKey),

        403 => {
            let quota = message.to_lowercase().contains("quota")
                || error_details
                    .as_ref()
                    .is_some_and(|d| d.status.eq_ignore_ascii_case("RESOURCE_EXHAUSTED"));
            if quota {
                SurveyorError::Authentication(AuthenticationError::QuotaExceeded)
            } else {
                SurveyorError::Authentication(AuthenticationError::InvalidApiKey)
            }
        }

        404 => {
            let resource_name = extract_resource_name(&message);
            if message.to_lowercase().contains("file") {
                SurveyorError::Resource(ResourceError::FileNotFound {
                    file_name: resource_name,
                })
            } else {
                SurveyorError::Resource(ResourceError::ModelNotFound {
                    model: resource_name,
                })
            }
        }

        413 => {
            let (size, max_size) = extract_size_info(&message);
            SurveyorError::Request(RequestError::PayloadTooLarge { size, max_size })
        }

        415 => SurveyorError::Request(RequestError::UnsupportedMediaType {
            mime_type: extract_mime_type(&message),
        }),

        429 => SurveyorError::RateLimit(RateLimitError::TooManyRequests { retry_after: None }),

        503 => {
            if message.to_lowercase().contains("overload") {
                SurveyorError::Server(ServerError::ModelOverloaded {
                    model: extract_resource_name(&message),
                })
            } else {
                SurveyorError::Server(ServerError::ServiceUnavailable { retry_after: None })
            }
        }

        500..=599 => SurveyorError::Server(ServerError::InternalError { message }),

        _ => SurveyorError::Response(ResponseError::UnexpectedFormat {
            message: format!("HTTP {}: {}", status, message),
        }),
    }
}

/// Extracts resource name from error message (simple heuristic).
fn extract_resource_name(message: &str) -> String {
    if let Some(found) = message
        .split_whitespace()
        .find(|s| s.starts_with("models/") || s.starts_with("files/"))
    {
        return found
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-' && c != '_' && c != '.')
            .to_string();
    }

    for quote in ['\'', '"'] {
        if let Some(start) = message.find(quote) {
            if let Some(end) = message[start + 1..].find(quote) {
                return message[start + 1..start + 1 + end].to_string();
            }
        }
    }

    "unknown".to_string()
}

/// Extracts size information from error message.
fn extract_size_info(message: &str) -> (usize, usize) {
    let numbers: Vec<usize> = message
        .split_whitespace()
        .filter_map(|s| s.trim_matches(|c: char| !c.is_numeric()).parse().ok())
        .collect();

    match numbers.as_slice() {
        [] => (0, 0),
        [size] => (*size, 0),
        [size, max, ..] => (*size, *max),
    }
}

/// Extracts MIME type from error message.
fn extract_mime_type(message: &str) -> String {
    const PREFIXES: [&str; 5] = ["image/", "video/", "audio/", "application/", "text/"];

    message
        .split_whitespace()
        .find(|word| PREFIXES.iter().any(|p| word.starts_with(p)))
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '/')
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Parses validation details from error response details array.
fn parse_validation_details(details: &[serde_json::Value]) -> Vec<ValidationDetail> {
    details
        .iter()
        .filter_map(|detail| {
            let obj = detail.as_object()?;
            let field = obj
                .get("field")
                .or_else(|| obj.get("fieldPath"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            let description = obj
                .get("description")
                .or_else(|| obj.get("message"))
                .and_then(|v| v.as_str())
                .filter(|d| !d.is_empty())?;

            Some(ValidationDetail {
                field: field.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}
