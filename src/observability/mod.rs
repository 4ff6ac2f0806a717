//! Observability for the surveyor: structured, redacting log events.

mod logging;

pub use logging::{Logger, StructuredLogger};

use crate::config::LogLevel;
use std::sync::Arc;

/// Creates the shared logger for a named component.
pub fn create_logger(name: &str, level: LogLevel) -> Arc<dyn Logger> {
    Arc::new(StructuredLogger::new(name).with_level(level))
}
