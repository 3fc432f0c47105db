//! Text-generation assistant: pre-fills a command from natural language or
//! drafts a note for a logged command. The parser core never calls this.

mod gemini;

pub use gemini::GeminiAssistant;

use async_trait::async_trait;
use opsvault_common::model::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Assistant API key is not set (expected in ${0})")]
    MissingKey(String),
    #[error("Assistant request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Assistant returned an unusable response: {0}")]
    Malformed(String),
}

/// A generated command suggestion, ready to drop into the command library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSuggestion {
    pub command: String,
    pub description: String,
    #[serde(default)]
    pub category: Category,
}

#[async_trait]
pub trait Assistant {
    /// Turn a natural-language request into a concrete shell command.
    async fn suggest_command(&self, query: &str) -> Result<CommandSuggestion, AssistError>;

    /// Draft a short note explaining a logged command and its outcome.
    async fn summarize_log(&self, command: &str, output: &str) -> Result<String, AssistError>;
}
