use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use askmydb_core::{Config, ConfigError};

use crate::provider::{GenerateError, GenerationRequest, QueryProvider};
use crate::providers::create_provider;

/// Converts natural-language questions into database queries via the
/// configured provider. The provider is resolved once at construction and
/// reused for the service lifetime.
pub struct QueryService {
    provider: Box<dyn QueryProvider>,
    connection: Option<String>,
}

/// Full result of one generation call. `connection` is the downstream DB
/// connection name from config, passed through untouched for whoever
/// executes the query.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GeneratedQuery {
    pub prompt: String,
    pub query: String,
    pub connection: Option<String>,
}

impl QueryService {
    pub fn new(provider: Box<dyn QueryProvider>, connection: Option<String>) -> Self {
        Self {
            provider,
            connection,
        }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider = create_provider(config)?;
        Ok(Self::new(provider, config.connection.clone()))
    }

    /// Generate a query from a natural-language question.
    ///
    /// The provider's outcome is surfaced unchanged: no retry, no fallback.
    pub async fn ask(
        &self,
        prompt: &str,
        schema_context: &str,
    ) -> Result<GeneratedQuery, GenerateError> {
        info!("Generating query for: {}", prompt);

        let request = GenerationRequest::new(prompt, schema_context);
        let response = self.provider.generate(&request).await?;

        debug!("Provider response: {}", response);

        let query = extract_query(&response);
        if query.is_empty() {
            return Err(GenerateError::Parse(
                "provider returned an empty query".to_string(),
            ));
        }

        Ok(GeneratedQuery {
            prompt: prompt.to_string(),
            query: query.to_string(),
            connection: self.connection.clone(),
        })
    }

    /// Same as [`ask`](Self::ask), raced against a cancellation token.
    /// Cancellation drops the in-flight request and returns
    /// [`GenerateError::Cancelled`].
    pub async fn ask_with_cancel(
        &self,
        prompt: &str,
        schema_context: &str,
        cancel: &CancellationToken,
    ) -> Result<GeneratedQuery, GenerateError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerateError::Cancelled),
            result = self.ask(prompt, schema_context) => result,
        }
    }
}

/// Statement starters recognized when a backend wraps the query in prose.
const STATEMENT_KEYWORDS: &[&str] = &[
    "SELECT", "WITH", "INSERT", "UPDATE", "DELETE", "SHOW", "EXPLAIN",
];

/// Extract the query from an LLM response, handling markdown code blocks.
fn extract_query(response: &str) -> &str {
    let trimmed = response.trim();

    // Handle ```sql ... ``` blocks
    if let Some(start) = trimmed.find("```sql") {
        let sql_start = start + 6;
        if let Some(end) = trimmed[sql_start..].find("```") {
            return trimmed[sql_start..sql_start + end].trim();
        }
    }

    // Handle ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let block_start = start + 3;
        // Skip past any language identifier on the same line
        let after_tick = &trimmed[block_start..];
        let content_start = after_tick.find('\n').map_or(0, |n| n + 1);
        if let Some(end) = after_tick[content_start..].find("```") {
            return after_tick[content_start..content_start + end].trim();
        }
    }

    // Prose-wrapped statement: slice from the first statement keyword.
    if let Some(at) = STATEMENT_KEYWORDS
        .iter()
        .filter_map(|k| trimmed.find(k))
        .min()
    {
        return trimmed[at..].trim();
    }

    trimmed
}
