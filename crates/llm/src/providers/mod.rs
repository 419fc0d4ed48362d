pub mod dummy;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use askmydb_core::{Config, ConfigError, ProviderKind};

use crate::provider::QueryProvider;

/// Create the query-generation provider selected by config.
///
/// Dispatch happens on the already-parsed [`ProviderKind`], so this never
/// fails for a validated config; the api-key check mirrors validation for
/// callers that skip it.
pub fn create_provider(config: &Config) -> Result<Box<dyn QueryProvider>, ConfigError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider {
        ProviderKind::Dummy => Ok(Box::new(dummy::DummyProvider::new())),
        ProviderKind::Openai => {
            let api_key = config
                .openai
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or(ConfigError::MissingApiKey)?;
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.to_string(),
                config.openai.model.clone(),
                config.openai.base_url.clone(),
                config.openai.temperature,
                config.max_tokens,
                timeout,
            )))
        }
        ProviderKind::Ollama => Ok(Box::new(ollama::OllamaProvider::new(
            config.ollama.base_url.clone(),
            config.ollama.model.clone(),
            config.max_tokens,
            timeout,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askmydb_core::{OllamaConfig, OpenAiConfig};

    fn config_for(provider: ProviderKind) -> Config {
        Config {
            provider,
            connection: None,
            openai: OpenAiConfig {
                api_key: Some("sk-test".to_string()),
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.2,
            },
            ollama: OllamaConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.1".to_string(),
            },
            timeout_secs: 30,
            max_tokens: 1024,
        }
    }

    #[test]
    fn resolves_every_valid_kind() {
        for kind in [ProviderKind::Dummy, ProviderKind::Openai, ProviderKind::Ollama] {
            let config = config_for(kind);
            config.validate().unwrap();
            assert!(create_provider(&config).is_ok());
        }
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let mut config = config_for(ProviderKind::Openai);
        config.openai.api_key = None;
        assert!(matches!(
            create_provider(&config),
            Err(ConfigError::MissingApiKey)
        ));
    }
}
