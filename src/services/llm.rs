//! LLM extraction backend.
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint (Groq by
//! default). The reply is returned as raw text; validation happens later in
//! [`crate::services::validator`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::ExtractionConfig;
use crate::services::schema::ExtractionSchema;

/// Client for the extraction model.
pub struct LlmExtractor {
    client: Client,
    config: ExtractionConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl LlmExtractor {
    /// Build an extractor, or `None` when no API key is configured.
    pub fn from_config(config: &ExtractionConfig, timeout: Duration) -> Result<Option<Self>> {
        let Some(api_key) = config.resolve_api_key() else {
            log::warn!(
                "{} not set. LLM extraction will be skipped.",
                config.api_key_env
            );
            return Ok(None);
        };

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Some(Self {
            client,
            config: config.clone(),
            api_key,
        }))
    }

    /// Run one extraction over `content`, returning the model's JSON text.
    pub async fn extract(&self, content: &str, schema: &ExtractionSchema) -> Result<String> {
        let request = self.build_request(content, schema)?;

        let endpoint = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!("Requesting extraction from {} ({})", endpoint, self.config.model);

        let response: ChatResponse = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::extraction("model returned no choices"))?;

        Ok(clean_reply(&reply).to_string())
    }

    fn build_request(&self, content: &str, schema: &ExtractionSchema) -> Result<ChatRequest<'_>> {
        Ok(ChatRequest {
            model: &self.config.model,
            messages: self.build_messages(content, schema)?,
            temperature: self.config.temperature,
            response_format: ResponseFormat { kind: "json_object" },
        })
    }

    fn build_messages(&self, content: &str, schema: &ExtractionSchema) -> Result<Vec<ChatMessage>> {
        let schema_text = serde_json::to_string_pretty(&schema.schema)?;
        let truncated: String = content.chars().take(self.config.max_content_chars).collect();

        Ok(vec![
            ChatMessage {
                role: "system".to_string(),
                content: format!(
                    "You extract structured data from web pages. Reply with JSON only: \
                     a single object or an array of objects, each matching this JSON schema:\n{}",
                    schema_text
                ),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!(
                    "{}\n\nInput format: {}\n\n{}",
                    schema.instruction, self.config.input_format, truncated
                ),
            },
        ])
    }
}

/// Strip reasoning blocks and code fences around the JSON payload.
fn clean_reply(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(end) = text.rfind("</think>") {
        text = text[end + "</think>".len()..].trim();
    }
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_end().strip_suffix("```").unwrap_or(rest).trim();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::services::schema;

    #[test]
    fn test_clean_reply_plain_json() {
        assert_eq!(clean_reply("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_clean_reply_strips_think_and_fence() {
        let reply = "<think>looking at the page</think>\n```json\n[{\"name\": \"Widget\"}]\n```";
        assert_eq!(clean_reply(reply), "[{\"name\": \"Widget\"}]");
    }

    #[test]
    fn test_missing_key_disables_backend() {
        let config = ExtractionConfig {
            api_key_env: "PAGECRAWL_TEST_NO_SUCH_KEY".to_string(),
            ..ExtractionConfig::default()
        };
        let extractor = LlmExtractor::from_config(&config, Duration::from_secs(5)).unwrap();
        assert!(extractor.is_none());
    }

    #[test]
    fn test_prompt_truncates_content() {
        let config = ExtractionConfig {
            api_key: Some("key".to_string()),
            max_content_chars: 4,
            ..ExtractionConfig::default()
        };
        let extractor = LlmExtractor::from_config(&config, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        let schema = schema::select(ContentType::Product, None, None);

        let messages = extractor.build_messages("abcdefgh", &schema).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains("\"name\""));
        assert!(messages[1].content.starts_with(&schema.instruction));
        assert!(messages[1].content.ends_with("abcd"));
        assert!(messages[1].content.contains("Input format: markdown"));
    }

    #[test]
    fn test_request_asks_for_json_object() {
        let config = ExtractionConfig {
            api_key: Some("key".to_string()),
            temperature: 0.2,
            ..ExtractionConfig::default()
        };
        let extractor = LlmExtractor::from_config(&config, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        let schema = schema::select(ContentType::Article, None, None);

        let request = extractor.build_request("page body", &schema).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["response_format"], serde_json::json!({"type": "json_object"}));
        assert_eq!(body["model"], "deepseek-r1-distill-llama-70b");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    }
}
