//! Content service implementation for generating content with Gemini models.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use super::ContentService;
use super::validation::validate_generate_request;
use crate::auth::AuthManager;
use crate::config::SurveyorConfig;
use crate::error::{ContentError, SurveyorError};
use crate::observability::{Logger, StructuredLogger};
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{
    BlockReason, FinishReason, GenerateContentRequest, GenerateContentResponse, SafetyRating,
};

/// Implementation of the ContentService.
pub struct ContentServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
}

impl ContentServiceImpl {
    /// Create a new content service implementation.
    pub fn new(
        config: Arc<SurveyorConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        let request_builder = RequestBuilder::new(
            config.base_url.clone(),
            config.api_version.clone(),
            auth_manager,
        );

        Self {
            transport,
            request_builder,
            logger: Arc::new(StructuredLogger::new("surveyor.content").with_level(config.log_level)),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Maps prompt blocks and blocked candidates to `ContentError`.
    fn check_safety_blocks(&self, response: &GenerateContentResponse) -> Result<(), SurveyorError> {
        if let Some(feedback) = &response.prompt_feedback {
            if let Some(block_reason) = &feedback.block_reason {
                tracing::warn!(block_reason = ?block_reason, "Prompt blocked");
                return match block_reason {
                    BlockReason::Safety => Err(ContentError::SafetyBlocked {
                        reason: describe_ratings(feedback.safety_ratings.as_deref()),
                    }
                    .into()),
                    BlockReason::Blocklist | BlockReason::ProhibitedContent => {
                        Err(ContentError::ProhibitedContent.into())
                    }
                    BlockReason::Other => Err(ContentError::SafetyBlocked {
                        reason: "prompt blocked (unspecified reason)".to_string(),
                    }
                    .into()),
                };
            }
        }

        for (index, candidate) in response.candidates.iter().flatten().enumerate() {
            let Some(finish_reason) = &candidate.finish_reason else {
                continue;
            };

            match finish_reason {
                FinishReason::Safety => {
                    tracing::warn!(candidate_index = index, "Candidate blocked for safety");
                    return Err(ContentError::SafetyBlocked {
                        reason: describe_ratings(candidate.safety_ratings.as_deref()),
                    }
                    .into());
                }
                FinishReason::Recitation => {
                    tracing::warn!(candidate_index = index, "Candidate blocked for recitation");
                    return Err(ContentError::RecitationBlocked.into());
                }
                FinishReason::ProhibitedContent | FinishReason::Blocklist => {
                    tracing::warn!(candidate_index = index, "Candidate blocked as prohibited");
                    return Err(ContentError::ProhibitedContent.into());
                }
                FinishReason::MaxTokens => {
                    tracing::warn!(candidate_index = index, "Response truncated at max tokens");
                }
                FinishReason::Stop | FinishReason::Other => {}
            }
        }

        Ok(())
    }

    fn log_usage_statistics(&self, response: &GenerateContentResponse) {
        if let Some(usage) = &response.usage_metadata {
            tracing::info!(
                prompt_tokens = usage.prompt_token_count,
                completion_tokens = usage.candidates_token_count.unwrap_or(0),
                total_tokens = usage.total_token_count,
                "Content generation usage"
            );
        }
    }
}

/// First safety rating, formatted for the error message.
fn describe_ratings(ratings: Option<&[SafetyRating]>) -> String {
    ratings
        .and_then(|r| r.first())
        .map(|r| format!("{} ({})", r.category, r.probability))
        .unwrap_or_else(|| "unspecified".to_string())
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, SurveyorError> {
        let start = Instant::now();

        self.logger.debug(
            "Starting content generation",
            json!({
                "model": model,
                "contents_count": request.contents.len(),
                "has_generation_config": request.generation_config.is_some(),
            }),
        );

        validate_generate_request(&request)?;

        let path = endpoints::generate_content(model);
        let http_request = self
            .request_builder
            .build_request(HttpMethod::Post, &path, Some(&request))?;

        let http_response = self.transport.send(http_request).await.map_err(|e| {
            let error = SurveyorError::from(e);
            self.logger.error(
                "Network error during content generation",
                json!({ "error": error.to_string(), "model": model }),
            );
            error
        })?;

        let response: GenerateContentResponse = ResponseParser::parse_response(http_response)?;

        if let Err(e) = self.check_safety_blocks(&response) {
            self.logger.warn(
                "Content generation blocked",
                json!({
                    "error": e.to_string(),
                    "model": model,
                    "duration_ms": start.elapsed().as_millis() as u64,
                }),
            );
            return Err(e);
        }

        self.log_usage_statistics(&response);
        self.logger.debug(
            "Content generation completed",
            json!({
                "model": model,
                "duration_ms": start.elapsed().as_millis() as u64,
                "candidates": response.candidates.as_ref().map_or(0, Vec::len),
            }),
        );

        Ok(response)
    }
}
