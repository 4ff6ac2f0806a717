//! Validation functions for file operations.

use crate::error::{RequestError, SurveyorResult, ValidationDetail};
use crate::types::UploadFileRequest;

/// Maximum file size accepted by the upload endpoint (2 GiB).
pub const MAX_FILE_SIZE: usize = 2 * 1024 * 1024 * 1024;

/// Maximum display name length.
const MAX_DISPLAY_NAME_LENGTH: usize = 256;

/// Validate an upload file request.
pub fn validate_upload_request(request: &UploadFileRequest) -> SurveyorResult<()> {
    let mut details = Vec::new();

    if request.mime_type.trim().is_empty() {
        details.push(ValidationDetail {
            field: "mime_type".to_string(),
            description: "MIME type must not be empty".to_string(),
        });
    }

    if request.file_data.is_empty() {
        details.push(ValidationDetail {
            field: "file_data".to_string(),
            description: "File data must not be empty".to_string(),
        });
    }

    if request.file_data.len() > MAX_FILE_SIZE {
        details.push(ValidationDetail {
            field: "file_data".to_string(),
            description: format!(
                "File size {} bytes exceeds maximum of {} bytes",
                request.file_data.len(),
                MAX_FILE_SIZE
            ),
        });
    }

    if let Some(display_name) = &request.display_name {
        if display_name.is_empty() {
            details.push(ValidationDetail {
                field: "display_name".to_string(),
                description: "Display name must not be empty if provided".to_string(),
            });
        }

        if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            details.push(ValidationDetail {
                field: "display_name".to_string(),
                description: format!(
                    "Display name length {} exceeds maximum of {}",
                    display_name.chars().count(),
                    MAX_DISPLAY_NAME_LENGTH
                ),
            });
        }
    }

    if !details.is_empty() {
        return Err(RequestError::ValidationError {
            message: "Invalid upload file request".to_string(),
            details,
        }
        .into());
    }

    Ok(())
}

/// Validate a file resource name.
pub fn validate_file_name(name: &str) -> SurveyorResult<()> {
    if name.trim().is_empty() || name.trim() == "files/" {
        return Err(RequestError::ValidationError {
            message: "Invalid file name".to_string(),
            details: vec![ValidationDetail {
                field: "name".to_string(),
                description: "File name must not be empty".to_string(),
            }],
        }
        .into());
    }

    Ok(())
}
