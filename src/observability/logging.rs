//! Structured logging for the surveyor.
//!
//! Events go through `tracing`; context is passed as a JSON value and any
//! credential-looking keys are masked before emission.

use serde_json::Value;
use crate::config::LogLevel;

/// Keys whose values never reach the log output.
const SENSITIVE_KEYS: [&str; 11] = [
    "api_key", "apiKey", "key",
    "token", "access_token", "accessToken",
    "secret", "password", "credential",
    "authorization", "x-goog-api-key",
];

const REDACTED: &str = "***REDACTED***";

/// Logger trait for structured logging.
pub trait Logger: Send + Sync {
    /// Log a debug message with structured context.
    fn debug(&self, message: &str, fields: Value);

    /// Log an info message with structured context.
    fn info(&self, message: &str, fields: Value);

    /// Log a warning message with structured context.
    fn warn(&self, message: &str, fields: Value);

    /// Log an error message with structured context.
    fn error(&self, message: &str, fields: Value);
}

/// Logger that emits `tracing` events under a fixed target name.
pub struct StructuredLogger {
    name: String,
    level: LogLevel,
}

impl StructuredLogger {
    /// Create a new structured logger with the given name.
    ///
    /// ```
    /// use quantity_surveyor::observability::StructuredLogger;
    ///
    /// let logger = StructuredLogger::new("surveyor.files");
    /// ```
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
        }
    }

    /// Set the minimum log level for this logger.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    /// Masks sensitive keys at any depth, including inside arrays.
    fn redact_sensitive_fields(&self, mut fields: Value) -> Value {
        redact(&mut fields);
        fields
    }
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            for (key, inner) in obj.iter_mut() {
                if SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                    *inner = Value::String(REDACTED.to_string());
                } else {
                    redact(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

impl Logger for StructuredLogger {
    fn debug(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Debug) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::debug!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn info(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Info) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::info!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn warn(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::warn!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }

    fn error(&self, message: &str, fields: Value) {
        if !self.should_log(LogLevel::Error) {
            return;
        }

        let redacted_fields = self.redact_sensitive_fields(fields);
        tracing::error!(logger = %self.name, fields = %redacted_fields, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_logger_with_level() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Debug);
        assert_eq!(logger.level, LogLevel::Debug);
        assert_eq!(logger.name, "test");
    }

    #[test]
    fn test_should_log() {
        let logger = StructuredLogger::new("test").with_level(LogLevel::Info);
        assert!(logger.should_log(LogLevel::Error));
        assert!(logger.should_log(LogLevel::Warn));
        assert!(logger.should_log(LogLevel::Info));
        assert!(!logger.should_log(LogLevel::Debug));
        assert!(!logger.should_log(LogLevel::Trace));
    }

    #[test]
    fn test_redact_sensitive_fields() {
        let logger = StructuredLogger::new("test");

        let fields = json!({
            "api_key": "secret-key-123",
            "model": "gemini-1.5-pro",
            "pdf": "plan.pdf"
        });

        let redacted = logger.redact_sensitive_fields(fields);

        assert_eq!(redacted["api_key"], REDACTED);
        assert_eq!(redacted["model"], "gemini-1.5-pro");
        assert_eq!(redacted["pdf"], "plan.pdf");
    }

    #[test]
    fn test_redact_nested_and_array_fields() {
        let logger = StructuredLogger::new("test");

        let fields = json!({
            "request": {
                "X-Goog-Api-Key": "abc",
                "url": "https://example.com"
            },
            "headers": [{"authorization": "Bearer t"}]
        });

        let redacted = logger.redact_sensitive_fields(fields);

        assert_eq!(redacted["request"]["X-Goog-Api-Key"], REDACTED);
        assert_eq!(redacted["request"]["url"], "https://example.com");
        assert_eq!(redacted["headers"][0]["authorization"], REDACTED);
    }
}
