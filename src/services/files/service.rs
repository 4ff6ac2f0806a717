//! Files service implementation for the Gemini API.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use super::FilesService;
use super::validation::{validate_file_name, validate_upload_request};
use crate::auth::AuthManager;
use crate::config::SurveyorConfig;
use crate::error::SurveyorError;
use crate::observability::{Logger, StructuredLogger};
use crate::transport::{endpoints, HttpMethod, HttpTransport, RequestBuilder, ResponseParser};
use crate::types::{File, UploadFileRequest, UploadFileResponse};

/// Implementation of the Files service.
pub struct FilesServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    upload_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
}

impl FilesServiceImpl {
    /// Create a new files service instance.
    pub fn new(
        config: Arc<SurveyorConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        let request_builder = RequestBuilder::new(
            config.base_url.clone(),
            config.api_version.clone(),
            auth_manager.clone(),
        );
        let upload_builder = RequestBuilder::new(
            config.upload_base_url.clone(),
            config.api_version.clone(),
            auth_manager,
        );

        Self {
            transport,
            request_builder,
            upload_builder,
            logger: Arc::new(StructuredLogger::new("surveyor.files").with_level(config.log_level)),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Create the `multipart/related` body: JSON metadata, then the raw file.
    fn create_multipart_body(request: &UploadFileRequest, boundary: &str) -> Vec<u8> {
        let mut body = Vec::with_capacity(request.file_data.len() + 512);

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");

        let metadata = json!({
            "file": {
                "display_name": request.display_name
            }
        });
        body.extend_from_slice(metadata.to_string().as_bytes());
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", request.mime_type).as_bytes());
        body.extend_from_slice(&request.file_data);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        body
    }
}

#[async_trait]
impl FilesService for FilesServiceImpl {
    async fn upload(&self, request: UploadFileRequest) -> Result<File, SurveyorError> {
        validate_upload_request(&request)?;

        let boundary = format!("surveyor_boundary_{}", uuid::Uuid::new_v4().simple());
        let body = Self::create_multipart_body(&request, &boundary);

        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            format!("multipart/related; boundary={}", boundary),
        );
        headers.insert("X-Goog-Upload-Protocol".to_string(), "multipart".to_string());

        let http_request = self.upload_builder.build_raw_request(
            HttpMethod::Post,
            endpoints::FILES,
            Bytes::from(body),
            headers,
        )?;

        self.logger.debug(
            "Uploading file",
            json!({
                "display_name": request.display_name,
                "mime_type": request.mime_type,
                "size_bytes": request.file_data.len(),
            }),
        );

        let response = self.transport.send(http_request).await?;
        let file = ResponseParser::parse_response::<UploadFileResponse>(response)?.into_file();

        self.logger.info(
            "File uploaded",
            json!({ "name": file.name, "state": file.state, "uri": file.uri }),
        );

        Ok(file)
    }

    async fn get(&self, file_name: &str) -> Result<File, SurveyorError> {
        validate_file_name(file_name)?;

        let http_request = self
            .request_builder
            .build_empty_request(HttpMethod::Get, &endpoints::file(file_name))?;

        let response = self.transport.send(http_request).await?;
        ResponseParser::parse_response(response)
    }

    async fn delete(&self, file_name: &str) -> Result<(), SurveyorError> {
        validate_file_name(file_name)?;

        let http_request = self
            .request_builder
            .build_empty_request(HttpMethod::Delete, &endpoints::file(file_name))?;

        let response = self.transport.send(http_request).await?;
        ResponseParser::check_status(&response)?;

        self.logger.debug("File deleted", json!({ "name": file_name }));
        Ok(())
    }
}
