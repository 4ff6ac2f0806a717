//! Request and response types for the parts of the Gemini API the surveyor uses.

pub mod content;
pub mod files;
pub mod generation;

pub use content::{Blob, Content, FileData, Part, Role};

pub use files::{File, FileState, UploadFileRequest, UploadFileResponse};

pub use generation::{
    BlockReason, Candidate, FinishReason, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, PromptFeedback, SafetyRating, UsageMetadata,
};
