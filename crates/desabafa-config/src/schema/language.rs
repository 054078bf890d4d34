//! Language selection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Locale tag used when `--language` is not given.
    pub default: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: "en-US".into(),
        }
    }
}
