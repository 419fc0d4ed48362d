pub mod config;
pub mod error;

pub use config::{Config, OllamaConfig, OpenAiConfig, ProviderKind};
pub use error::ConfigError;
