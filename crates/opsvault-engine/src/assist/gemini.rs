use super::{AssistError, Assistant, CommandSuggestion};
use crate::config::AssistConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// How much command output goes into a summarization prompt.
const MAX_OUTPUT_CHARS: usize = 1000;

pub struct GeminiAssistant {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiAssistant {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from config, reading the key from the configured
    /// environment variable.
    pub fn from_config(config: &AssistConfig) -> Result<Self, AssistError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| AssistError::MissingKey(config.api_key_env.clone()))?;
        Ok(Self::new(config.model.clone(), api_key))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String, AssistError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        debug!("Assistant request to model {}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AssistError::Malformed("no candidates in response".to_string()))
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn suggest_command(&self, query: &str) -> Result<CommandSuggestion, AssistError> {
        let prompt = format!(
            "You are a Linux expert. A user is asking for a Linux command related to: \"{}\".\n\
             Provide the most appropriate command, a brief description, and the best fitting \
             category out of: File System, Network, Process, User Management, \
             Archive/Compression, System Info, Package Mgmt, Other.\n\
             If the request is vague, provide the most common interpretation.\n\
             Answer with a JSON object with keys \"command\", \"description\", \"category\".",
            query
        );

        let request = GenerateRequest {
            contents: vec![Content::from_text(prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let text = self.generate(&request).await?;
        let cleaned = strip_code_fence(&text);
        serde_json::from_str(cleaned)
            .map_err(|e| AssistError::Malformed(format!("{} in {:?}", e, cleaned)))
    }

    async fn summarize_log(&self, command: &str, output: &str) -> Result<String, AssistError> {
        let truncated: String = output.chars().take(MAX_OUTPUT_CHARS).collect();
        let prompt = format!(
            "You are a DevOps assistant helping to document server operations.\n\
             Analyze the following Linux command and its execution output.\n\n\
             Command: {}\n\
             Output (truncated): {}\n\n\
             Provide a concise summary explaining the purpose of this command and what the \
             result indicates. Focus on the intent and the outcome. Answer with just the note \
             text, 1-2 sentences.",
            command,
            if truncated.is_empty() {
                "(No output)"
            } else {
                truncated.as_str()
            }
        );

        let request = GenerateRequest {
            contents: vec![Content::from_text(prompt)],
            generation_config: None,
        };

        let text = self.generate(&request).await?;
        Ok(text.trim().to_string())
    }
}

/// Models sometimes wrap JSON answers in a Markdown fence despite the
/// response MIME type; strip it before decoding.
fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn from_text(text: String) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(
            strip_code_fence("```json\n{\"command\":\"ls\"}\n```"),
            "{\"command\":\"ls\"}"
        );
        assert_eq!(strip_code_fence("{\"command\":\"ls\"}"), "{\"command\":\"ls\"}");
    }

    #[test]
    fn suggestion_decodes_spaced_category() {
        let raw = r#"{"command":"df -h","description":"Show disk usage","category":"System Info"}"#;
        let suggestion: CommandSuggestion = serde_json::from_str(raw).unwrap();
        assert_eq!(suggestion.command, "df -h");
        assert_eq!(
            suggestion.category,
            opsvault_common::model::Category::SystemInfo
        );
    }
}
