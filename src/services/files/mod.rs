//! Files service: uploads drawings and tracks their processing state.

mod service;
mod validation;

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::error::{NetworkError, ResourceError, SurveyorError};
use crate::types::{File, FileState, UploadFileRequest};

pub use service::FilesServiceImpl;
pub use validation::{validate_file_name, validate_upload_request, MAX_FILE_SIZE};

/// Service for file upload and management.
#[async_trait]
pub trait FilesService: Send + Sync {
    /// Upload a file.
    async fn upload(&self, request: UploadFileRequest) -> Result<File, SurveyorError>;

    /// Get file metadata.
    async fn get(&self, file_name: &str) -> Result<File, SurveyorError>;

    /// Delete a file.
    async fn delete(&self, file_name: &str) -> Result<(), SurveyorError>;

    /// Polls a file until it is `ACTIVE`.
    ///
    /// Fails with `FileProcessingFailed` when the service reports `FAILED` and
    /// with a timeout once `timeout` has elapsed.
    async fn wait_for_active(
        &self,
        file_name: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<File, SurveyorError> {
        let start = Instant::now();

        loop {
            let file = self.get(file_name).await?;

            match file.state {
                Some(FileState::Active) => return Ok(file),
                Some(FileState::Failed) => {
                    return Err(ResourceError::FileProcessingFailed {
                        file_name: file_name.to_string(),
                        message: "the file service reported FAILED".to_string(),
                    }
                    .into());
                }
                Some(FileState::Processing) | Some(FileState::StateUnspecified) | None => {}
            }

            if start.elapsed() >= timeout {
                return Err(NetworkError::Timeout { duration: timeout }.into());
            }

            tracing::debug!(file = %file_name, "file still processing");
            tokio::time::sleep(poll_interval).await;
        }
    }
}
