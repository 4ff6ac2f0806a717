//! # Quantity Surveyor
//!
//! Extracts a Bill of Quantities (BOQ) and a Bar Bending Schedule (BBS) from
//! construction drawings with the Google Gemini API.
//!
//! A drawing is uploaded through the Gemini Files API, the model is asked for
//! a fixed JSON shape, and the reply is parsed and normalized locally: every
//! bar weight is recomputed from its diameter and total length so that the
//! model's arithmetic is never trusted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quantity_surveyor::{QuantitySurveyor, SurveyorConfig};
//! use secrecy::SecretString;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SurveyorConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .build()?;
//!
//!     let surveyor = QuantitySurveyor::new(config)?;
//!     let extraction = surveyor.analyze_pdf(Path::new("drawing.pdf")).await?;
//!
//!     println!("{}", quantity_surveyor::report::format_bbs_table(&extraction.result.bbs));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `surveyor` - The end-to-end workflow and its builder
//! - `extraction` - Prompt, reply parsing, weight normalization, summary
//! - `report` - Text tables and the files written to the output directory
//! - `config` - Configuration types and builder
//! - `auth` - API key handling
//! - `transport` - HTTP transport layer
//! - `error` - Error types and taxonomy
//! - `types` - Gemini request and response types
//! - `services` - Files and content generation services

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod config;
pub mod error;
pub mod extraction;
pub mod observability;
pub mod report;
pub mod resilience;
pub mod services;
pub mod surveyor;
pub mod transport;
pub mod types;

// Development/testing modules - always available for integration tests
pub mod mocks;
pub mod fixtures;

// Re-exports for convenience
pub use auth::{ApiKeyAuthManager, AuthManager};
pub use config::{
    AuthMethod, LogLevel, SurveyorConfig, SurveyorConfigBuilder, DEFAULT_API_VERSION,
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    // Main error types
    SurveyorError,
    SurveyorResult,
    // Error categories
    AuthenticationError,
    ConfigurationError,
    ContentError,
    NetworkError,
    RateLimitError,
    ReportError,
    RequestError,
    ResourceError,
    ResponseError,
    ServerError,
    ValidationDetail,
};
pub use extraction::{
    analyze_response, normalize, parse_response, steel_weight_kg, BbsItem, BoqItem, Extraction,
    ExtractionError, ExtractionResult, NormalizationError, NormalizationReport, NormalizeOptions,
    Summary,
};
pub use observability::{Logger, StructuredLogger};
pub use resilience::{RetryConfig, RetryExecutor};
pub use services::{ContentService, FilesService};
pub use surveyor::{QuantitySurveyor, QuantitySurveyorBuilder};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
