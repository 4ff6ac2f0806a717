//! The surveyor: drawing in, normalized quantities out.

mod builder;

use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use crate::config::SurveyorConfig;
use crate::error::{ResourceError, ResponseError, SurveyorResult};
use crate::extraction::{analyze_response, Extraction, NormalizeOptions, EXTRACTION_PROMPT};
use crate::observability::Logger;
use crate::resilience::RetryExecutor;
use crate::services::{ContentService, FilesService};
use crate::types::{Content, File, FileState, GenerateContentRequest, Part, UploadFileRequest};

pub use builder::QuantitySurveyorBuilder;

/// MIME type sent for drawings.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Uploads a drawing, asks Gemini for its quantities and normalizes the reply.
pub struct QuantitySurveyor {
    config: Arc<SurveyorConfig>,
    files: Arc<dyn FilesService>,
    content: Arc<dyn ContentService>,
    retry: RetryExecutor,
    logger: Arc<dyn Logger>,
    normalize_options: NormalizeOptions,
    keep_upload: bool,
}

impl QuantitySurveyor {
    /// Creates a builder.
    pub fn builder(config: SurveyorConfig) -> QuantitySurveyorBuilder {
        QuantitySurveyorBuilder::new(config)
    }

    /// Creates a surveyor with the reqwest transport.
    pub fn new(config: SurveyorConfig) -> SurveyorResult<Self> {
        QuantitySurveyorBuilder::new(config).build()
    }

    /// Creates a surveyor from environment variables.
    pub fn from_env() -> SurveyorResult<Self> {
        Self::new(SurveyorConfig::from_env()?)
    }

    pub(crate) fn from_parts(
        config: Arc<SurveyorConfig>,
        files: Arc<dyn FilesService>,
        content: Arc<dyn ContentService>,
        logger: Arc<dyn Logger>,
        normalize_options: NormalizeOptions,
        keep_upload: bool,
    ) -> Self {
        Self {
            retry: RetryExecutor::new(config.retry_config.clone()),
            config,
            files,
            content,
            logger,
            normalize_options,
            keep_upload,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SurveyorConfig {
        &self.config
    }

    /// Returns the normalizer options.
    pub fn normalize_options(&self) -> &NormalizeOptions {
        &self.normalize_options
    }

    /// Analyzes a PDF drawing end to end.
    ///
    /// The upload is deleted afterwards unless `keep_upload` was set; a failed
    /// delete is only logged. A reply that cannot be parsed is not an error:
    /// the placeholder result comes back with the raw text attached.
    pub async fn analyze_pdf(&self, path: &Path) -> SurveyorResult<Extraction> {
        let file = self.upload_drawing(path).await?;
        let outcome = self.extract_from_file(&file).await;

        if !self.keep_upload {
            self.delete_upload(&file).await;
        }

        outcome
    }

    /// Runs the parse and normalize pipeline on text captured earlier.
    pub fn analyze_text(&self, text: &str) -> Extraction {
        analyze_response(text, &self.normalize_options)
    }

    /// Uploads the drawing at `path` and waits until the service reports it
    /// ACTIVE.
    pub async fn upload_drawing(&self, path: &Path) -> SurveyorResult<File> {
        let data = tokio::fs::read(path).await.map_err(|e| ResourceError::DrawingUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let request = UploadFileRequest {
            display_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            file_data: data,
            mime_type: PDF_MIME_TYPE.to_string(),
        };

        self.logger.info(
            "Uploading drawing",
            json!({ "path": path.display().to_string(), "size_bytes": request.file_data.len() }),
        );

        let file = self
            .retry
            .execute(|| self.files.upload(request.clone()))
            .await?;

        if file.state == Some(FileState::Active) {
            return Ok(file);
        }

        self.files
            .wait_for_active(&file.name, self.config.processing_timeout, self.config.poll_interval)
            .await
    }

    /// Sends the extraction prompt for an uploaded drawing and returns the
    /// model's text.
    pub async fn request_extraction(&self, file: &File) -> SurveyorResult<String> {
        let uri = file.uri.clone().ok_or_else(|| ResponseError::UnexpectedFormat {
            message: format!("uploaded file {} has no URI", file.name),
        })?;
        let mime_type = file.mime_type.clone().unwrap_or_else(|| PDF_MIME_TYPE.to_string());

        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::file(uri, mime_type),
                Part::text(EXTRACTION_PROMPT),
            ])],
            system_instruction: None,
            generation_config: None,
        };

        self.logger.info("Requesting extraction", json!({ "model": self.config.model, "file": file.name }));

        let response = self
            .retry
            .execute(|| self.content.generate(&self.config.model, request.clone()))
            .await?;

        response.text().ok_or_else(|| ResponseError::EmptyResponse.into())
    }

    async fn extract_from_file(&self, file: &File) -> SurveyorResult<Extraction> {
        let text = self.request_extraction(file).await?;
        let extraction = self.analyze_text(&text);

        if let Some(error) = &extraction.parse_error {
            self.logger.warn(
                "Model reply could not be parsed",
                json!({ "error": error.to_string(), "response_len": text.len() }),
            );
        }
        self.logger.info(
            "Extraction complete",
            json!({
                "boq_items": extraction.result.boq.len(),
                "bbs_items": extraction.result.bbs.len(),
                "weights_recomputed": extraction.report.recomputed,
                "diagnostics": extraction.report.diagnostics.len(),
            }),
        );

        Ok(extraction)
    }

    async fn delete_upload(&self, file: &File) {
        if let Err(e) = self.files.delete(&file.name).await {
            self.logger.warn(
                "Could not delete uploaded drawing",
                json!({ "file": file.name, "error": e.to_string() }),
            );
        }
    }
}

impl std::fmt::Debug for QuantitySurveyor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantitySurveyor")
            .field("model", &self.config.model)
            .field("normalize_options", &self.normalize_options)
            .field("keep_upload", &self.keep_upload)
            .finish_non_exhaustive()
    }
}
