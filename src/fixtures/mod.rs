//! Test fixtures: captured model replies and Gemini API bodies.
//!
//! All fixtures live beside this module under `src/fixtures/`.

use serde_json::json;
use std::path::PathBuf;

/// Get the path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("fixtures")
        .join(relative_path)
}

/// Load a fixture file as a string.
pub fn load_fixture(relative_path: &str) -> String {
    std::fs::read_to_string(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", relative_path, e))
}

/// Load a JSON fixture and parse it.
pub fn load_json_fixture<T: serde::de::DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON fixture {}: {}", relative_path, e))
}

/// A `generateContent` response body whose single candidate says `text`.
pub fn generate_response_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    })
    .to_string()
}

/// A file resource body in the given state.
pub fn file_body(name: &str, state: &str) -> String {
    json!({
        "name": name,
        "mimeType": "application/pdf",
        "uri": format!("https://generativelanguage.googleapis.com/v1beta/{}", name),
        "state": state
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, FileState, GenerateContentResponse};

    #[test]
    fn test_load_fixture() {
        let content = load_fixture("responses/fenced.txt");
        assert!(content.contains("```json"));
    }

    #[test]
    fn test_generate_response_fixture() {
        let response: GenerateContentResponse = load_json_fixture("content/generate_response.json");
        assert!(response.text().unwrap().contains("F1-M1"));
    }

    #[test]
    fn test_generated_bodies_parse() {
        let response: GenerateContentResponse =
            serde_json::from_str(&generate_response_body("hello")).unwrap();
        assert_eq!(response.text().as_deref(), Some("hello"));

        let file: File = serde_json::from_str(&file_body("files/x", "ACTIVE")).unwrap();
        assert_eq!(file.state, Some(FileState::Active));
    }
}
