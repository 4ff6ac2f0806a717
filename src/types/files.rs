//! File-related types for the Gemini API.

use serde::{Deserialize, Serialize};

/// A file stored in Gemini's file service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// The resource name of the file (`files/...`).
    pub name: String,
    /// The display name of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// The MIME type of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// The size of the file in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<String>,
    /// The expiration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    /// The URI of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// The state of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<FileState>,
}

/// The state of a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    /// File is being processed.
    Processing,
    /// File is active and ready to use.
    Active,
    /// File processing failed.
    Failed,
    /// State not reported.
    #[serde(other)]
    StateUnspecified,
}

/// Request to upload a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFileRequest {
    /// The display name for the file.
    pub display_name: Option<String>,
    /// The file data.
    pub file_data: Vec<u8>,
    /// The MIME type of the file.
    pub mime_type: String,
}

/// Body returned by the upload endpoint.
///
/// The API wraps the file in a `file` object; a bare file is accepted too.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UploadFileResponse {
    /// `{"file": {...}}`
    Wrapped {
        /// The uploaded file.
        file: File,
    },
    /// `{...}`
    Bare(File),
}

impl UploadFileResponse {
    /// Unwraps the uploaded file.
    pub fn into_file(self) -> File {
        match self {
            UploadFileResponse::Wrapped { file } | UploadFileResponse::Bare(file) => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_wrapped_and_bare() {
        let wrapped: UploadFileResponse =
            serde_json::from_str(r#"{"file":{"name":"files/a","state":"PROCESSING"}}"#).unwrap();
        assert_eq!(wrapped.into_file().name, "files/a");

        let bare: UploadFileResponse =
            serde_json::from_str(r#"{"name":"files/b","state":"ACTIVE"}"#).unwrap();
        let file = bare.into_file();
        assert_eq!(file.name, "files/b");
        assert_eq!(file.state, Some(FileState::Active));
    }

    #[test]
    fn test_unknown_state() {
        let file: File = serde_json::from_str(r#"{"name":"files/c","state":"STATE_UNSPECIFIED"}"#).unwrap();
        assert_eq!(file.state, Some(FileState::StateUnspecified));
    }
}
