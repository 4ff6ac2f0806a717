//! Errors raised inside the extraction pipeline.
//!
//! None of these reach the pipeline's caller: they are logged and turned into
//! diagnostic lines in the result's notes.

use thiserror::Error;

/// Failure to pull a result out of the model's text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No JSON found in response")]
    NoJsonFound,

    #[error("Malformed JSON: {message}")]
    MalformedJson { message: String },
}

/// Failure to recompute one BBS entry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("BBS item '{mark}' is missing a numeric {field}")]
    MissingField { mark: String, field: &'static str },

    #[error(
        "BBS item '{mark}': total_length {total_length} differs from count x length {expected}"
    )]
    LengthMismatch {
        mark: String,
        total_length: f64,
        expected: f64,
    },
}
