//! Google Gemini API client.
//!
//! Implements `CompletionClient` for Gemini models via the Generative
//! Language API, streaming replies over SSE.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
