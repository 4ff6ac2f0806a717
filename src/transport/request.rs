//! HTTP request builder for the Gemini API.
//!
//! Handles URL construction with the API version prefix, authentication via
//! the configured auth manager, and JSON body serialization.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthManager;
use crate::error::SurveyorError;
use super::http::{HttpRequest, HttpMethod};

/// Builder for constructing HTTP requests to the Gemini API.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: Url,
    api_version: String,
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    ///
    /// A missing trailing slash on `base_url` is added so that path joins keep
    /// any prefix such as `/upload`.
    pub fn new(
        mut base_url: Url,
        api_version: String,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// Builds a complete URL for the given endpoint path, adding the auth
    /// query parameter when the key travels in the URL.
    ///
    /// ```
    /// # use quantity_surveyor::transport::RequestBuilder;
    /// # use quantity_surveyor::auth::ApiKeyAuthManager;
    /// # use quantity_surveyor::config::SurveyorConfig;
    /// # use secrecy::SecretString;
    /// # use std::sync::Arc;
    /// # let config = SurveyorConfig::builder()
    /// #     .api_key(SecretString::new("test-key".into()))
    /// #     .build()
    /// #     .unwrap();
    /// let builder = RequestBuilder::new(
    ///     config.base_url.clone(),
    ///     config.api_version.clone(),
    ///     Arc::new(ApiKeyAuthManager::from_config(&config)),
    /// );
    /// let url = builder.build_url("/models/gemini-1.5-pro:generateContent").unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
    /// );
    /// ```
    pub fn build_url(&self, path: &str) -> Result<Url, SurveyorError> {
        let path = path.trim_start_matches('/');
        let full_path = format!("{}/{}", self.api_version, path);

        let mut url = self.base_url.join(&full_path)?;

        if let Some((key, value)) = self.auth_manager.get_auth_query_param() {
            url.query_pairs_mut().append_pair(&key, &value);
        }

        Ok(url)
    }

    fn base_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some((key, value)) = self.auth_manager.get_auth_header() {
            headers.insert(key, value);
        }
        headers
    }

    /// Builds an HTTP request with an optional JSON body.
    pub fn build_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
    ) -> Result<HttpRequest, SurveyorError> {
        let url = self.build_url(path)?;
        let mut headers = self.base_headers();

        let body_bytes = match body {
            Some(body) => {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
                Some(Bytes::from(serde_json::to_vec(body)?))
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body_bytes,
        })
    }

    /// Builds a bodiless request (GET, DELETE).
    pub fn build_empty_request(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> Result<HttpRequest, SurveyorError> {
        self.build_request::<()>(method, path, None)
    }

    /// Builds a request carrying a pre-encoded body, such as a multipart upload.
    pub fn build_raw_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Bytes,
        extra_headers: HashMap<String, String>,
    ) -> Result<HttpRequest, SurveyorError> {
        let url = self.build_url(path)?;
        let mut headers = self.base_headers();
        headers.extend(extra_headers);

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: Some(body),
        })
    }
}
