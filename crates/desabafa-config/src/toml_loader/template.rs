//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Desabafa Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[chat]
# model = "gemini-2.5-flash"
# Name of the environment variable holding the API key.
# Without it the chat starts in "unavailable" mode.
# api_key_env = "API_KEY"
# max_tokens = 2048      # 1-8192
# temperature = 0.7      # 0.0-2.0

[language]
# default = "en-US"      # pt-PT, pt-BR, en-US, en-GB, es-ES

[logging]
# level = "INFO"         # DEBUG, INFO, WARNING, ERROR
"##
}
