//! Validation functions for content generation requests.

use crate::error::{RequestError, SurveyorResult, ValidationDetail};
use crate::types::{GenerateContentRequest, GenerationConfig, Part};

/// Validate a generate content request, collecting every problem found.
pub fn validate_generate_request(request: &GenerateContentRequest) -> SurveyorResult<()> {
    let mut details = Vec::new();

    if request.contents.is_empty() {
        details.push(ValidationDetail {
            field: "contents".to_string(),
            description: "Contents array cannot be empty".to_string(),
        });
    }

    for (idx, content) in request.contents.iter().enumerate() {
        if content.parts.is_empty() {
            details.push(ValidationDetail {
                field: format!("contents[{}].parts", idx),
                description: "Content must have at least one part".to_string(),
            });
        }

        for (part_idx, part) in content.parts.iter().enumerate() {
            details.extend(validate_part(part, &format!("contents[{}].parts[{}]", idx, part_idx)));
        }
    }

    if let Some(system_instruction) = &request.system_instruction {
        for (part_idx, part) in system_instruction.parts.iter().enumerate() {
            details.extend(validate_part(part, &format!("system_instruction.parts[{}]", part_idx)));
        }
    }

    if let Some(config) = &request.generation_config {
        details.extend(validate_generation_config(config));
    }

    if !details.is_empty() {
        return Err(RequestError::ValidationError {
            message: "Invalid generate content request".to_string(),
            details,
        }
        .into());
    }

    Ok(())
}

/// Problems with a single part.
pub fn validate_part(part: &Part, field_prefix: &str) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    match part {
        Part::Text { text } => {
            if text.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.text", field_prefix),
                    description: "Text cannot be empty".to_string(),
                });
            }
        }
        Part::InlineData { inline_data } => {
            if inline_data.mime_type.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.inline_data.mime_type", field_prefix),
                    description: "MIME type is required".to_string(),
                });
            }
            if inline_data.data.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.inline_data.data", field_prefix),
                    description: "Data cannot be empty".to_string(),
                });
            }
        }
        Part::FileData { file_data } => {
            if file_data.file_uri.is_empty() {
                details.push(ValidationDetail {
                    field: format!("{}.file_data.file_uri", field_prefix),
                    description: "File URI is required".to_string(),
                });
            }
        }
        Part::Other(_) => {}
    }

    details
}

/// Problems with the generation config.
pub fn validate_generation_config(config: &GenerationConfig) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if let Some(temp) = config.temperature {
        if !(0.0..=2.0).contains(&temp) {
            details.push(ValidationDetail {
                field: "generation_config.temperature".to_string(),
                description: "Temperature must be between 0.0 and 2.0".to_string(),
            });
        }
    }

    if let Some(max_tokens) = config.max_output_tokens {
        if max_tokens < 1 {
            details.push(ValidationDetail {
                field: "generation_config.max_output_tokens".to_string(),
                description: "max_output_tokens must be >= 1".to_string(),
            });
        }
    }

    details
}
