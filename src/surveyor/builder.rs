//! Builder for [`QuantitySurveyor`].

use std::sync::Arc;

use super::QuantitySurveyor;
use crate::auth::{ApiKeyAuthManager, AuthManager};
use crate::config::SurveyorConfig;
use crate::error::SurveyorError;
use crate::extraction::NormalizeOptions;
use crate::observability::{create_logger, Logger};
use crate::services::{ContentServiceImpl, FilesServiceImpl};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Builder for [`QuantitySurveyor`].
///
/// ```no_run
/// use quantity_surveyor::{QuantitySurveyor, SurveyorConfig};
/// use secrecy::SecretString;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SurveyorConfig::builder()
///     .api_key(SecretString::new("your-api-key".into()))
///     .build()?;
///
/// let surveyor = QuantitySurveyor::builder(config)
///     .keep_upload(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct QuantitySurveyorBuilder {
    config: SurveyorConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    logger: Option<Arc<dyn Logger>>,
    normalize_options: NormalizeOptions,
    keep_upload: bool,
}

impl QuantitySurveyorBuilder {
    /// Starts a builder from a configuration.
    pub fn new(config: SurveyorConfig) -> Self {
        Self {
            config,
            transport: None,
            auth_manager: None,
            logger: None,
            normalize_options: NormalizeOptions::default(),
            keep_upload: false,
        }
    }

    /// Use a custom HTTP transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom auth manager instead of the configured API key.
    pub fn auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    /// Use a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set the normalizer options.
    pub fn normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalize_options = options;
        self
    }

    /// Leave the uploaded drawing on the file service after analysis.
    pub fn keep_upload(mut self, keep: bool) -> Self {
        self.keep_upload = keep;
        self
    }

    /// Builds the surveyor.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be created.
    pub fn build(self) -> Result<QuantitySurveyor, SurveyorError> {
        let config = Arc::new(self.config);

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(config.timeout, config.connect_timeout)?),
        };

        let auth_manager: Arc<dyn AuthManager> = self
            .auth_manager
            .unwrap_or_else(|| Arc::new(ApiKeyAuthManager::from_config(&config)));

        let logger = self
            .logger
            .unwrap_or_else(|| create_logger("surveyor", config.log_level));

        let files = FilesServiceImpl::new(config.clone(), transport.clone(), auth_manager.clone());
        let content = ContentServiceImpl::new(config.clone(), transport, auth_manager);

        logger.info(
            "Surveyor initialized",
            serde_json::json!({
                "base_url": config.base_url.as_str(),
                "api_version": config.api_version,
                "model": config.model,
                "auth_method": format!("{:?}", config.auth_method),
            }),
        );

        Ok(QuantitySurveyor::from_parts(
            config,
            Arc::new(files),
            Arc::new(content),
            logger,
            self.normalize_options,
            self.keep_upload,
        ))
    }
}
