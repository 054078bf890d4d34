//! Configuration schema types for Desabafa.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod language;
mod logging;

pub use chat::*;
pub use language::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Desabafa.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DesabafaConfig {
    pub chat: ChatConfig,
    pub language: LanguageConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
