use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Placeholder in the system prompt that gets replaced with the schema context.
pub(crate) const SCHEMA_PLACEHOLDER: &str = "<<<schema>>>";

/// System prompt given to every network-backed provider.
pub(crate) const SYSTEM_PROMPT_TEMPLATE: &str = "\
You translate natural-language questions into a single database query.

Database schema:
<<<schema>>>

Respond ONLY with the query, no explanation.";

/// One generation call: the user's question plus whatever schema context the
/// caller wants the backend to see. Created per call, never reused.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub schema_context: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, schema_context: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema_context: schema_context.into(),
        }
    }

    /// Reject blank prompts before any provider work happens.
    pub fn ensure_prompt(&self) -> Result<(), GenerateError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerateError::InvalidInput("prompt is empty".to_string()));
        }
        Ok(())
    }

    /// Build the chat messages sent to a backend: system prompt with the
    /// schema context substituted, then the user's question.
    pub fn to_messages(&self) -> Vec<Message> {
        let system = SYSTEM_PROMPT_TEMPLATE.replace(SCHEMA_PLACEHOLDER, &self.schema_context);
        vec![
            Message {
                role: Role::System,
                content: system,
            },
            Message {
                role: Role::User,
                content: self.prompt.clone(),
            },
        ]
    }
}

/// Trait for query-generation providers; each backend implements this.
///
/// Implementations hold their settings from construction and mutate nothing
/// afterwards, so a single instance is safe to share across tasks.
#[async_trait]
pub trait QueryProvider: Send + Sync {
    /// Turn a natural-language request into a query string.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError>;
}

/// Per-call failures. Returned as values, never panics; the caller decides
/// whether to retry, surface, or fall back.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication rejected: {status}: {body}")]
    Auth { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerateError::Timeout
        } else {
            GenerateError::Network(err.to_string())
        }
    }
}
