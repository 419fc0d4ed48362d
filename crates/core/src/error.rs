use thiserror::Error;

/// Configuration errors are fatal at startup: no provider is constructed
/// from a config that fails validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY must be set and non-empty when provider is 'openai'")]
    MissingApiKey,

    #[error("temperature must be within [0, 2], got {0}")]
    InvalidTemperature(f32),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unknown provider: '{0}' (expected dummy, openai, or ollama)")]
    UnsupportedProvider(String),
}
