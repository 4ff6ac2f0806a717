//! Endpoint paths for the Gemini API.

/// Base path for models endpoints.
pub const MODELS: &str = "/models";

/// Base path for files endpoints.
pub const FILES: &str = "/files";

/// Path of the `generateContent` endpoint for a model.
///
/// ```
/// use quantity_surveyor::transport::endpoints;
///
/// assert_eq!(
///     endpoints::generate_content("gemini-1.5-pro"),
///     "/models/gemini-1.5-pro:generateContent"
/// );
/// ```
pub fn generate_content(model: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!("{}/{}:generateContent", MODELS, model)
}

/// Path of a file resource. Accepts both `files/abc` and `abc`.
///
/// ```
/// use quantity_surveyor::transport::endpoints;
///
/// assert_eq!(endpoints::file("abc123"), "/files/abc123");
/// assert_eq!(endpoints::file("files/abc123"), "/files/abc123");
/// ```
pub fn file(name: &str) -> String {
    let id = name.strip_prefix("files/").unwrap_or(name);
    format!("{}/{}", FILES, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_path() {
        assert_eq!(generate_content("gemini-pro"), "/models/gemini-pro:generateContent");
        assert_eq!(
            generate_content("models/gemini-pro"),
            "/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_file_path() {
        assert_eq!(file("abc123"), "/files/abc123");
        assert_eq!(file("files/abc123"), "/files/abc123");
    }
}
