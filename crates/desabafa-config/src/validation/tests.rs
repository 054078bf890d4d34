//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    assert!(validate(&DesabafaConfig::default()).is_ok());
}

#[test]
fn catches_temperature_too_high() {
    let mut config = DesabafaConfig::default();
    config.chat.temperature = 2.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("chat.temperature"));
}

#[test]
fn catches_nan_temperature() {
    let mut config = DesabafaConfig::default();
    config.chat.temperature = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn catches_max_tokens_zero() {
    let mut config = DesabafaConfig::default();
    config.chat.max_tokens = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("chat.max_tokens"));
}

#[test]
fn catches_blank_model() {
    let mut config = DesabafaConfig::default();
    config.chat.model = "   ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("chat.model must not be empty"));
}

#[test]
fn catches_malformed_language_tag() {
    let mut config = DesabafaConfig::default();
    config.language.default = "pt_PT".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("language.default"));
}

#[test]
fn accepts_bare_language_subtag() {
    let mut config = DesabafaConfig::default();
    config.language.default = "es".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn collects_multiple_errors() {
    let mut config = DesabafaConfig::default();
    config.chat.max_tokens = 100_000;
    config.chat.api_key_env = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("chat.max_tokens"));
    assert!(err.contains("chat.api_key_env"));
    assert!(err.contains("; "));
}
