//! Full configuration validation.
//!
//! Checks numeric ranges and the shape of string settings, collecting
//! every problem into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::DesabafaConfig;
use desabafa_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &DesabafaConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_non_empty(&mut errors, "chat.model", &config.chat.model);
    validate_non_empty(&mut errors, "chat.api_key_env", &config.chat.api_key_env);
    validate_range(&mut errors, "chat.max_tokens", config.chat.max_tokens, 1, 8192);
    validate_range_f64(&mut errors, "chat.temperature", config.chat.temperature, 0.0, 2.0);

    if !is_locale_tag(&config.language.default) {
        errors.push(format!(
            "language.default = {:?} is not a locale tag like \"pt-PT\"",
            config.language.default
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// `xx` or `xx-YY`: alphabetic subtags joined by hyphens.
fn is_locale_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphabetic()))
}
