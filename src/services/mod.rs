//! Gemini API services used by the surveyor.

pub mod content;
pub mod files;

pub use content::{ContentService, ContentServiceImpl};
pub use files::{FilesService, FilesServiceImpl};
