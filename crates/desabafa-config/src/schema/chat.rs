//! Chat backend configuration.

use serde::{Deserialize, Serialize};

/// Remote model settings.
///
/// The API key itself never lives in the config file; only the name of
/// the environment variable that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub api_key_env: String,
    /// Valid range: 1-8192.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            api_key_env: "API_KEY".into(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}
