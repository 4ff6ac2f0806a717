//! Response parser: model text in, `ExtractionResult` out.

use super::error::ExtractionError;
use super::locate::json_candidates;
use super::model::ExtractionResult;

/// Diagnostic prefix placed in `notes` when parsing fails.
pub const PARSE_FAILED_NOTE: &str = "Parsing failed - see raw response";

/// Parses the first usable JSON object in `text`.
///
/// Candidates come from [`json_candidates`]. The first candidate that
/// deserializes wins; when none does, the first candidate's error is returned.
pub fn parse_response(text: &str) -> Result<ExtractionResult, ExtractionError> {
    let candidates = json_candidates(text);
    let mut first_error = None;

    for candidate in candidates {
        match serde_json::from_str::<ExtractionResult>(candidate) {
            Ok(result) => return Ok(result),
            Err(e) => {
                tracing::debug!(error = %e, "JSON candidate rejected");
                first_error.get_or_insert(ExtractionError::MalformedJson {
                    message: e.to_string(),
                });
            }
        }
    }

    Err(first_error.unwrap_or(ExtractionError::NoJsonFound))
}

/// Parses `text`, degrading to the placeholder result on failure.
///
/// The error is returned next to the placeholder so the caller can keep the
/// raw text for inspection.
pub fn parse_or_placeholder(text: &str) -> (ExtractionResult, Option<ExtractionError>) {
    match parse_response(text) {
        Ok(result) => (result, None),
        Err(e) => {
            tracing::warn!(error = %e, response_len = text.len(), "Could not parse model response");
            let placeholder = ExtractionResult::placeholder(format!("{PARSE_FAILED_NOTE} ({e})"));
            (placeholder, Some(e))
        }
    }
}
