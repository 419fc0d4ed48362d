use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{GenerateError, GenerationRequest, QueryProvider, Role};

/// Local Ollama backend. Same request shape as the hosted providers but no
/// API key; an absent daemon surfaces as a network error.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OllamaProvider {
    pub fn new(base_url: String, model: String, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            max_tokens,
            timeout,
        }
    }
}

#[async_trait]
impl QueryProvider for OllamaProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        request.ensure_prompt()?;

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));

        let api_messages: Vec<serde_json::Value> = request
            .to_messages()
            .iter()
            .map(|m| {
                json!({
                    "role": match m.role {
                        Role::System => "system",
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let body = json!({
            "model": self.model,
            "messages": api_messages,
            "stream": false,
            "options": {
                "num_predict": self.max_tokens,
            },
        });

        debug!("Ollama request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        let text = response.text().await?;
        let resp: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GenerateError::Parse(format!("invalid JSON body: {e}")))?;
        let content = resp["message"]["content"]
            .as_str()
            .ok_or_else(|| GenerateError::Parse("missing message.content".to_string()))?
            .to_string();

        Ok(content)
    }
}
