//! Drawing extraction pipeline.
//!
//! Model text goes through [`parse_response`] and then [`normalize()`]:
//!
//! ```
//! use quantity_surveyor::extraction::{analyze_response, NormalizeOptions};
//!
//! let fence = "`".repeat(3);
//! let text = format!(
//!     "Result:\n{fence}json\n{}\n{fence}",
//!     r#"{"scale": "1:100", "bbs": [{"mark": "F1-M1", "dia_mm": 12, "total_length": 17.6, "weight_kg": 1.32}]}"#
//! );
//!
//! let extraction = analyze_response(&text, &NormalizeOptions::default());
//! assert_eq!(extraction.result.bbs[0].weight_kg, Some(15.96));
//! assert!(extraction.raw_text.is_none());
//! ```
//!
//! Neither stage fails towards the caller. A response without usable JSON
//! becomes a placeholder result and the raw text is handed back for
//! inspection.

mod error;
mod locate;
mod model;
pub mod normalize;
pub mod parser;
mod prompt;
mod summary;

pub use error::{ExtractionError, NormalizationError};
pub use locate::{balanced_objects, fenced_json, json_candidates};
pub use model::{BbsItem, BoqItem, ExtractionResult, UNKNOWN_SCALE};
pub use normalize::{
    normalize, steel_weight_kg, NormalizationReport, NormalizeOptions,
    DEFAULT_LENGTH_TOLERANCE, UNIT_WEIGHT_DIVISOR, WASTAGE_FACTOR,
};
pub use parser::{parse_or_placeholder, parse_response, PARSE_FAILED_NOTE};
pub use prompt::EXTRACTION_PROMPT;
pub use summary::Summary;

/// Output of [`analyze_response`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The normalized result, or the placeholder.
    pub result: ExtractionResult,
    /// What the normalizer did.
    pub report: NormalizationReport,
    /// Why parsing failed, if it did.
    pub parse_error: Option<ExtractionError>,
    /// The model text, kept only when parsing failed.
    pub raw_text: Option<String>,
}

impl Extraction {
    /// True when the model text could not be parsed.
    pub fn parse_failed(&self) -> bool {
        self.parse_error.is_some()
    }
}

/// Parses and normalizes one model response.
pub fn analyze_response(text: &str, options: &NormalizeOptions) -> Extraction {
    let (mut result, parse_error) = parse_or_placeholder(text);
    let report = normalize(&mut result, options);
    let raw_text = parse_error.as_ref().map(|_| text.to_string());

    Extraction {
        result,
        report,
        parse_error,
        raw_text,
    }
}
