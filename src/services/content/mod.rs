//! Content generation service for the Gemini API.

mod service;
mod validation;

use async_trait::async_trait;
use crate::error::SurveyorError;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

pub use service::ContentServiceImpl;
pub use validation::{validate_generate_request, validate_generation_config, validate_part};

/// Service for content generation with Gemini models.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generate content for `model`.
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, SurveyorError>;
}
