use crate::config::AiSettings;
use crate::models::SearchRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the AI endpoint
#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("AI API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("AI response contained no choices")]
    EmptyResponse,
}

/// Which query syntax the translation prompt should target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDialect {
    Primo,
    VuFind,
}

impl QueryDialect {
    fn system_prompt(self) -> &'static str {
        match self {
            QueryDialect::Primo => {
                "You are an assistant that translates natural-language literature search \
                 requests into structured Primo search parameters. Output valid JSON only. \
                 Fields: q (string, the core search expression), filters (object with \
                 optional keys: year_from, year_to, language, material_type, subject, \
                 author, title)."
            }
            QueryDialect::VuFind => {
                "You are an assistant that converts natural-language library search queries \
                 into VuFind API search parameters. Return JSON with keys: 'lookfor' \
                 (string), 'type' (optional), 'filters' (dict: language, year_from, \
                 year_to, material_type)."
            }
        }
    }

    fn user_prompt(self, nl_query: &str) -> String {
        match self {
            QueryDialect::Primo => format!(
                "Translate this user query into a Primo search JSON:\nUser query:\n{}\n\nReturn only JSON.",
                nl_query
            ),
            QueryDialect::VuFind => format!(
                "Convert this user query into VuFind JSON:\n{}\nReturn only JSON.",
                nl_query
            ),
        }
    }
}

const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful academic research assistant.";
const DEFAULT_TRANSLATION_MAX_TOKENS: u32 = 400;
const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 1200;
const DEFAULT_TRANSLATION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 120;
/// At most this many records are fed into the summary prompt
const SUMMARY_RECORD_CAP: usize = 10;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat completions endpoint
///
/// Handles the two AI steps of the pipeline:
/// - translating a natural-language query into discovery search parameters
/// - summarizing normalized search results for the user
pub struct AiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    translation_max_tokens: u32,
    summary_max_tokens: u32,
    translation_timeout: Duration,
    summary_timeout: Duration,
}

impl AiClient {
    pub fn new(settings: &AiSettings) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            translation_max_tokens: settings
                .translation_max_tokens
                .unwrap_or(DEFAULT_TRANSLATION_MAX_TOKENS),
            summary_max_tokens: settings
                .summary_max_tokens
                .unwrap_or(DEFAULT_SUMMARY_MAX_TOKENS),
            translation_timeout: Duration::from_secs(
                settings
                    .translation_timeout_secs
                    .unwrap_or(DEFAULT_TRANSLATION_TIMEOUT_SECS),
            ),
            summary_timeout: Duration::from_secs(
                settings
                    .summary_timeout_secs
                    .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS),
            ),
        }
    }

    /// Translate a natural-language query into the backend's search syntax
    ///
    /// Returns the raw model output; parsing (and the fallback to the raw
    /// query) happens in `core::translate`.
    pub async fn translate(
        &self,
        nl_query: &str,
        dialect: QueryDialect,
    ) -> Result<String, AiError> {
        let user = dialect.user_prompt(nl_query);
        self.chat(
            dialect.system_prompt(),
            &user,
            self.translation_max_tokens,
            0.0,
            self.translation_timeout,
        )
        .await
    }

    /// Summarize normalized search results for the user
    ///
    /// An empty record list short-circuits without an API call.
    pub async fn summarize(
        &self,
        nl_query: &str,
        records: &[SearchRecord],
    ) -> Result<String, AiError> {
        if records.is_empty() {
            return Ok("No results to summarize.".to_string());
        }

        let prompt = build_summary_prompt(nl_query, records);
        self.chat(
            SUMMARY_SYSTEM_PROMPT,
            &prompt,
            self.summary_max_tokens,
            0.2,
            self.summary_timeout,
        )
        .await
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
        timeout: Duration,
    ) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            max_tokens,
            temperature,
        };

        tracing::debug!("AI request to {} ({} prompt chars)", url, user.len());

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(AiError::ApiError { status, body });
        }

        let chat: ChatResponse = response.json().await?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or(AiError::EmptyResponse)
    }
}

/// Build the research-assistant prompt over the normalized records
fn build_summary_prompt(nl_query: &str, records: &[SearchRecord]) -> String {
    let lines: Vec<String> = records
        .iter()
        .take(SUMMARY_RECORD_CAP)
        .enumerate()
        .map(|(i, r)| r.prompt_line(i + 1))
        .collect();

    format!(
        "You are a research assistant. A user asked: {}\n\n\
         Below are search results returned from a library catalog. Provide a concise \
         summary (3-6 sentences) that synthesizes the main themes covered by these \
         results, calls out any especially relevant items, and suggests 2 follow-up \
         search suggestions (phrased as natural-language queries) to refine the \
         results.\n\nResults:\n{}",
        nl_query,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> SearchRecord {
        SearchRecord {
            title: format!("Title {}", n),
            authors: "Doe, Jane".to_string(),
            year: "2021".to_string(),
            format: "article".to_string(),
            snippet: "Snippet.".to_string(),
            link: "#".to_string(),
        }
    }

    #[test]
    fn test_summary_prompt_enumerates_records() {
        let records = vec![record(1), record(2)];
        let prompt = build_summary_prompt("climate resilience", &records);

        assert!(prompt.contains("A user asked: climate resilience"));
        assert!(prompt.contains("1. Title 1 — Doe, Jane (2021) — Snippet."));
        assert!(prompt.contains("2. Title 2"));
    }

    #[test]
    fn test_summary_prompt_caps_at_ten_records() {
        let records: Vec<SearchRecord> = (1..=15).map(record).collect();
        let prompt = build_summary_prompt("q", &records);

        assert!(prompt.contains("10. Title 10"));
        assert!(!prompt.contains("11. Title 11"));
    }

    #[test]
    fn test_dialect_prompts_name_their_syntax() {
        assert!(QueryDialect::Primo.system_prompt().contains("Primo"));
        assert!(QueryDialect::VuFind.system_prompt().contains("VuFind"));
        assert!(QueryDialect::Primo
            .user_prompt("urban planning")
            .contains("urban planning"));
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let settings = AiSettings {
            api_url: "https://api.openai.com/v1/".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4".to_string(),
            translation_max_tokens: None,
            summary_max_tokens: None,
            translation_timeout_secs: None,
            summary_timeout_secs: None,
        };
        let client = AiClient::new(&settings);
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.translation_max_tokens, 400);
        assert_eq!(client.summary_max_tokens, 1200);
    }

    #[tokio::test]
    async fn test_summarize_short_circuits_on_empty_results() {
        let settings = AiSettings {
            api_url: "http://127.0.0.1:1/v1".to_string(),
            api_key: "sk-test".to_string(),
            model: "gpt-4".to_string(),
            translation_max_tokens: None,
            summary_max_tokens: None,
            translation_timeout_secs: None,
            summary_timeout_secs: None,
        };
        let client = AiClient::new(&settings);

        // No server is listening; the call must not go out at all
        let summary = client.summarize("anything", &[]).await.unwrap();
        assert_eq!(summary, "No results to summarize.");
    }
}
