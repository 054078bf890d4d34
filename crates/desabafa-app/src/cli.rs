use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Desabafa: an anonymous place to talk. Nothing you say is saved.
#[derive(Parser, Debug)]
#[command(name = "desabafa", version, about)]
pub struct Args {
    /// Conversation language (pt-PT, pt-BR, en-US, en-GB, es-ES).
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. "desabafa=debug".
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print a short article on a well-being topic, or list the topics.
    Tip { topic: Option<String> },
    /// List supported languages.
    Languages,
    /// Print the effective configuration as JSON.
    Config,
}

pub fn parse() -> Args {
    Args::parse()
}
