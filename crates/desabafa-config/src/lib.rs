//! Desabafa configuration system.
//!
//! TOML-based configuration with validation. All sections use serde
//! defaults so a partial file (or no file at all) works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use desabafa_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{DesabafaConfig, CONFIG_SCHEMA_VERSION};

use desabafa_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<DesabafaConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path (the `--config` override).
pub fn load_config_from(path: &Path) -> Result<DesabafaConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &DesabafaConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&DesabafaConfig::default());
        assert!(json.contains("\"chat\""));
        assert!(json.contains("\"language\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"gemini-2.5-flash\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\ntemperature = 9.0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("chat.temperature"));
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&DesabafaConfig::default());
        let parsed: DesabafaConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.chat.model, "gemini-2.5-flash");
        assert_eq!(parsed.language.default, "en-US");
    }
}
