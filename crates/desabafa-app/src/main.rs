mod cli;
mod console;
mod presenter;
mod repl;
#[cfg(test)]
mod test_support;
mod tips;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use desabafa_ai::{resolve_language, ChatSession, CompletionClient, GeminiClient, GeminiConfig};
use desabafa_common::{ConfigError, DesabafaError};
use desabafa_config::schema::ChatConfig;
use desabafa_config::DesabafaConfig;
use tokio::io::BufReader;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;
use crate::console::Console;
use crate::presenter::TerminalPresenter;

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("desabafa").join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

fn init_logging(directive: &str) {
    let filter = match directive.parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(e) => {
            eprintln!("Ignoring invalid log filter {directive:?}: {e}");
            EnvFilter::from_default_env()
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DesabafaConfig, ConfigError> {
    match path {
        Some(path) => desabafa_config::load_config_from(path),
        None => desabafa_config::load_config(),
    }
}

/// Remote model client, or `None` when no API key is available.
fn build_client(chat: &ChatConfig) -> Option<Arc<dyn CompletionClient>> {
    let config = match GeminiConfig::from_env(&chat.api_key_env) {
        Ok(config) => config
            .with_model(&chat.model)
            .with_max_tokens(chat.max_tokens)
            .with_temperature(chat.temperature),
        Err(e) => {
            tracing::warn!("{e}; chat is unavailable");
            return None;
        }
    };

    match GeminiClient::new(config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Chat backend ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::error!("Failed to create chat client: {e}");
            None
        }
    }
}

async fn chat(language: &str, client: Option<Arc<dyn CompletionClient>>) -> io::Result<()> {
    let console = Console::new(io::stdout());
    console.say_with(|out| repl::print_banner(out, language))?;

    let session = ChatSession::new(language, client.clone())
        .with_presenter(Box::new(TerminalPresenter::new(console.clone())));
    tracing::info!(
        session = %session.id().short(),
        language,
        available = session.is_available(),
        "Terminal chat ready"
    );

    repl::run(session, client, BufReader::new(tokio::io::stdin()), console).await
}

fn main() -> ExitCode {
    // Before the config is read, so api_key_env can name a .env entry.
    load_dotenv();

    let args = cli::parse();

    let (config, config_error) = match load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (DesabafaConfig::default(), Some(e)),
    };

    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    init_logging(&directive);

    tracing::info!("Desabafa v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let language = resolve_language(
        args.language
            .as_deref()
            .unwrap_or(&config.language.default),
    )
    .code;
    let client = build_client(&config.chat);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result: desabafa_common::Result<()> = runtime.block_on(async move {
        match args.command {
            Some(Command::Tip { topic }) => {
                tips::print_tip(&mut io::stdout(), client.as_deref(), topic.as_deref(), language)
                    .await?
            }
            Some(Command::Languages) => repl::print_languages(&mut io::stdout(), language)?,
            Some(Command::Config) => println!("{}", desabafa_config::config_to_json(&config)),
            None => chat(language, client).await?,
        }
        Ok::<(), DesabafaError>(())
    });

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Desabafa stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
