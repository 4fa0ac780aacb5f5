use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::errors::{LensbotError, LensbotResult};

/// Upper bound requested from the model, in output tokens.
pub const MAX_COMPLETION_TOKENS: u32 = 100;

/// Character budget the model is instructed to stay within.
pub const ANSWER_CHAR_LIMIT: usize = 1500;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Result of a completion call that reached the API successfully.
///
/// `NoAnswer` covers a 2xx response without usable text (no `choices`
/// field, or null content). It is kept distinct from a failed call so the
/// two conditions can be logged separately, even though the user-facing
/// fallback text is the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Answer(String),
    NoAnswer,
}

/// Single-turn chat completion against a hosted model.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Ask the model `query`, optionally attaching a base64 JPEG image.
    async fn complete(
        &self,
        query: &str,
        image_base64: Option<String>,
    ) -> LensbotResult<CompletionOutcome>;
}

/// Client for an OpenAI-compatible chat-completions endpoint with
/// bearer-token auth.
pub struct OpenAiCompletionClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiCompletionClient {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Build the single-turn request body: a text part instructing the
    /// model to respect the answer budget, plus an optional image part.
    fn build_payload(&self, query: &str, image_base64: Option<&str>) -> Value {
        let mut content = vec![json!({
            "type": "text",
            "text": format!(
                "Limit your response to {} characters for this query: {}",
                ANSWER_CHAR_LIMIT, query
            ),
        })];

        if let Some(image) = image_base64 {
            content.push(json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:image/jpeg;base64,{}", image),
                },
            }));
        }

        json!({
            "model": self.model,
            "max_tokens": MAX_COMPLETION_TOKENS,
            "messages": [{
                "role": "user",
                "content": content,
            }],
        })
    }

    fn parse_response(json: &Value) -> CompletionOutcome {
        match json["choices"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|choice| choice["message"]["content"].as_str())
        {
            Some(text) => CompletionOutcome::Answer(text.to_string()),
            None => CompletionOutcome::NoAnswer,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        query: &str,
        image_base64: Option<String>,
    ) -> LensbotResult<CompletionOutcome> {
        let payload = self.build_payload(query, image_base64.as_deref());
        debug!(
            "requesting completion: query_len={}, with_image={}",
            query.len(),
            image_base64.is_some()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| LensbotError::Completion(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(LensbotError::Completion(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| LensbotError::Completion(format!("invalid JSON response: {}", e)))?;

        Ok(Self::parse_response(&json))
    }
}

#[cfg(test)]
mod tests;
