//! Logging configuration types.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive scoped to our crates.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "desabafa=debug",
            LogLevel::Info => "desabafa=info",
            LogLevel::Warning => "desabafa=warn",
            LogLevel::Error => "desabafa=error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
