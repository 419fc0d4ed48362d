use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{GenerateError, GenerationRequest, QueryProvider, Role};

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
            temperature,
            max_tokens,
            timeout,
        }
    }
}

#[async_trait]
impl QueryProvider for OpenAiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        request.ensure_prompt()?;

        // base_url already carries the /v1 segment.
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

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
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        debug!("OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Auth { status, body });
        }
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        let text = response.text().await?;
        let resp: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GenerateError::Parse(format!("invalid JSON body: {e}")))?;
        let content = resp["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                GenerateError::Parse("missing choices[0].message.content".to_string())
            })?
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            "sk-test".to_string(),
            "gpt-4o-mini".to_string(),
            base_url.to_string(),
            0.2,
            1024,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn returns_assistant_content_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"SELECT * FROM users"}}]}"#,
            )
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let request = GenerationRequest::new("list users", "users(id)");

        let query = provider.generate(&request).await.unwrap();
        assert_eq!(query, "SELECT * FROM users");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key"}}"#)
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let request = GenerationRequest::new("list users", "");

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerateError::Auth { status: 401, .. }));
    }

    #[tokio::test]
    async fn server_failure_maps_to_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let request = GenerationRequest::new("list users", "");

        let err = provider.generate(&request).await.unwrap_err();
        match err {
            GenerateError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_content_maps_to_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let request = GenerationRequest::new("list users", "");

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[tokio::test]
    async fn non_json_body_maps_to_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let provider = provider_for(&server.url());
        let request = GenerationRequest::new("list users", "");

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }

    #[tokio::test]
    async fn empty_prompt_fails_before_any_request() {
        // No server at this address; an attempted request would surface as
        // Network, not InvalidInput.
        let provider = provider_for("http://127.0.0.1:1/v1");
        let request = GenerationRequest::new("  ", "");

        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }
}
