//! Configuration types for the quantity surveyor.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use crate::auth::resolve_api_key;
use crate::error::{SurveyorError, ConfigurationError};
use crate::resilience::RetryConfig;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default model used for drawing analysis.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Default request timeout (600 seconds). Drawing analysis is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default interval between file state polls (2 seconds).
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Default time to wait for an uploaded file to become active (300 seconds).
pub const DEFAULT_PROCESSING_TIMEOUT_SECS: u64 = 300;

/// Default max retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Authentication method for API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use x-goog-api-key header (recommended).
    #[default]
    Header,
    /// Use ?key= query parameter.
    QueryParam,
}

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

/// Configuration for the surveyor and its Gemini client.
#[derive(Clone)]
pub struct SurveyorConfig {
    /// API key (required).
    pub api_key: SecretString,
    /// Base URL for the API.
    pub base_url: Url,
    /// Base URL for media uploads.
    pub upload_base_url: Url,
    /// API version.
    pub api_version: String,
    /// Model used for generation.
    pub model: String,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Interval between file state polls.
    pub poll_interval: Duration,
    /// Maximum time to wait for an uploaded file to finish processing.
    pub processing_timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
    /// Log level.
    pub log_level: LogLevel,
    /// Authentication method.
    pub auth_method: AuthMethod,
}

impl SurveyorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SurveyorConfigBuilder {
        SurveyorConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), `GEMINI_BASE_URL`,
    /// `GEMINI_API_VERSION`, `GEMINI_MODEL`, `GEMINI_TIMEOUT_SECS` and
    /// `GEMINI_MAX_RETRIES`.
    pub fn from_env() -> Result<Self, SurveyorError> {
        let api_key = resolve_api_key(None).ok_or(ConfigurationError::MissingApiKey)?;

        Self::builder()
            .api_key(api_key)
            .apply_env()?
            .build()
    }
}

/// Builder for `SurveyorConfig`.
#[derive(Default)]
pub struct SurveyorConfigBuilder {
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    upload_base_url: Option<Url>,
    api_version: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    processing_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_config: Option<RetryConfig>,
    log_level: Option<LogLevel>,
    auth_method: Option<AuthMethod>,
}

impl SurveyorConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, SurveyorError> {
        self.base_url = Some(Url::parse(base_url)?);
        Ok(self)
    }

    /// Set the upload base URL. Defaults to `<base_url>/upload/`.
    pub fn upload_base_url(mut self, upload_base_url: &str) -> Result<Self, SurveyorError> {
        self.upload_base_url = Some(Url::parse(upload_base_url)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the model.
    pub fn model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the file state poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Set how long to wait for an uploaded file to become active.
    pub fn processing_timeout(mut self, timeout: Duration) -> Self {
        self.processing_timeout = Some(timeout);
        self
    }

    /// Set the maximum retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Apply the optional `GEMINI_*` environment overrides.
    ///
    /// The API key is not read here so that a key given on the command line
    /// always wins.
    pub fn apply_env(mut self) -> Result<Self, SurveyorError> {
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            self = self.base_url(&base_url)?;
        }
        if let Ok(version) = std::env::var("GEMINI_API_VERSION") {
            self = self.api_version(&version);
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self = self.model(&model);
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self = self.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = std::env::var("GEMINI_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            self = self.max_retries(retries);
        }
        Ok(self)
    }

    /// Build the configuration.
    pub fn build(self) -> Result<SurveyorConfig, SurveyorError> {
        let api_key = self.api_key
            .ok_or(ConfigurationError::MissingApiKey)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let upload_base_url = match self.upload_base_url {
            Some(url) => url,
            None => base_url.join("upload/")?,
        };

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "model name must not be empty".to_string(),
            }
            .into());
        }

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry_config.max_retries = max_retries;
        }

        Ok(SurveyorConfig {
            api_key,
            base_url,
            upload_base_url,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model,
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            poll_interval: self.poll_interval.unwrap_or(Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)),
            processing_timeout: self.processing_timeout.unwrap_or(Duration::from_secs(DEFAULT_PROCESSING_TIMEOUT_SECS)),
            retry_config,
            log_level: self.log_level.unwrap_or_default(),
            auth_method: self.auth_method.unwrap_or_default(),
        })
    }
}
