//! API key handling: where the key comes from and how it travels.

use crate::config::{AuthMethod, SurveyorConfig};
use secrecy::{ExposeSecret, SecretString};

/// Header carrying the key when [`AuthMethod::Header`] is used.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Query parameter carrying the key when [`AuthMethod::QueryParam`] is used.
pub const API_KEY_PARAM: &str = "key";

/// Environment variables searched for a key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Where a credential is placed on an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// A request header.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// A URL query parameter.
    Query {
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: String,
    },
}

/// Supplies the credential for outgoing requests.
pub trait AuthManager: Send + Sync {
    /// The credential to attach to every request.
    fn credential(&self) -> Credential;

    /// Header name and value, when the credential travels as a header.
    fn get_auth_header(&self) -> Option<(String, String)> {
        match self.credential() {
            Credential::Header { name, value } => Some((name, value)),
            Credential::Query { .. } => None,
        }
    }

    /// Query parameter name and value, when the credential travels in the URL.
    fn get_auth_query_param(&self) -> Option<(String, String)> {
        match self.credential() {
            Credential::Query { name, value } => Some((name, value)),
            Credential::Header { .. } => None,
        }
    }
}

/// Picks the first non-blank key: `explicit` first, then the variables in
/// [`API_KEY_ENV_VARS`]. Surrounding whitespace is trimmed.
pub fn resolve_api_key(explicit: Option<&str>) -> Option<SecretString> {
    let from_env = || {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
    };

    explicit
        .map(str::to_string)
        .filter(|key| !key.trim().is_empty())
        .or_else(from_env)
        .map(|key| SecretString::new(key.trim().to_string()))
}

/// Authenticates with a Gemini API key.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    auth_method: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString, auth_method: AuthMethod) -> Self {
        Self { api_key, auth_method }
    }

    /// Create from config.
    pub fn from_config(config: &SurveyorConfig) -> Self {
        Self::new(config.api_key.clone(), config.auth_method)
    }
}

impl AuthManager for ApiKeyAuthManager {
    fn credential(&self) -> Credential {
        let value = self.api_key.expose_secret().to_string();
        match self.auth_method {
            AuthMethod::Header => Credential::Header {
                name: API_KEY_HEADER.to_string(),
                value,
            },
            AuthMethod::QueryParam => Credential::Query {
                name: API_KEY_PARAM.to_string(),
                value,
            },
        }
    }
}

impl std::fmt::Debug for ApiKeyAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthManager")
            .field("api_key", &"[REDACTED]")
            .field("auth_method", &self.auth_method)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_credential() {
        let manager = ApiKeyAuthManager::new(SecretString::new("test-key".into()), AuthMethod::Header);

        assert_eq!(
            manager.get_auth_header(),
            Some(("x-goog-api-key".to_string(), "test-key".to_string()))
        );
        assert!(manager.get_auth_query_param().is_none());
    }

    #[test]
    fn test_query_credential() {
        let manager =
            ApiKeyAuthManager::new(SecretString::new("test-key".into()), AuthMethod::QueryParam);

        assert!(manager.get_auth_header().is_none());
        assert_eq!(
            manager.credential(),
            Credential::Query {
                name: "key".to_string(),
                value: "test-key".to_string(),
            }
        );
    }

    #[test]
    fn test_explicit_key_is_trimmed() {
        let key = resolve_api_key(Some("  abc123\n")).unwrap();
        assert_eq!(key.expose_secret(), "abc123");
    }

    #[test]
    fn test_debug_redacts_key() {
        let manager = ApiKeyAuthManager::new(SecretString::new("secret-123".into()), AuthMethod::Header);
        let debug = format!("{:?}", manager);

        assert!(!debug.contains("secret-123"));
        assert!(debug.contains("REDACTED"));
    }
}
