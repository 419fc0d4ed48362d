use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Provider selection ────────────────────────────────────────

/// Which query-generation backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Dummy,
    Openai,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Dummy => "dummy",
            ProviderKind::Openai => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dummy" => Ok(ProviderKind::Dummy),
            "openai" => Ok(ProviderKind::Openai),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active query-generation backend.
    pub provider: ProviderKind,
    /// Downstream DB connection name. Passed through to the caller that
    /// executes the generated query; never consumed by generation itself.
    pub connection: Option<String>,
    pub openai: OpenAiConfig,
    pub ollama: OllamaConfig,
    /// Request timeout applied to every network-backed generation call.
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Fails fast: a config that does not validate is never returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = env_or("ASKMYDB_PROVIDER", "dummy").parse()?;
        let config = Self {
            provider,
            connection: env_opt("ASKMYDB_CONNECTION"),
            openai: OpenAiConfig::from_env(),
            ollama: OllamaConfig::from_env(),
            timeout_secs: env_u64("ASKMYDB_TIMEOUT_SECS", 30),
            max_tokens: env_u32("ASKMYDB_MAX_TOKENS", 1024),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that must hold before any provider is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == ProviderKind::Openai
            && self.openai.api_key.as_deref().unwrap_or("").is_empty()
        {
            return Err(ConfigError::MissingApiKey);
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(ConfigError::InvalidTemperature(self.openai.temperature));
        }
        validate_base_url(&self.openai.base_url)?;
        validate_base_url(&self.ollama.base_url)?;
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  provider:    {}", self.provider.as_str());
        tracing::info!(
            "  connection:  {}",
            self.connection.as_deref().unwrap_or("(default)")
        );
        tracing::info!(
            "  openai:      base_url={}, model={}, temperature={}, api_key={}",
            self.openai.base_url,
            self.openai.model,
            self.openai.temperature,
            if self.openai.is_configured() { "set" } else { "(none)" },
        );
        tracing::info!(
            "  ollama:      base_url={}, model={}",
            self.ollama.base_url,
            self.ollama.model
        );
        tracing::info!(
            "  limits:      timeout={}s, max_tokens={}",
            self.timeout_secs,
            self.max_tokens
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": self.provider.as_str(),
            "connection": self.connection,
            "openai": {
                "base_url": self.openai.base_url,
                "model": self.openai.model,
                "temperature": self.openai.temperature,
                "configured": self.openai.is_configured(),
            },
            "ollama": {
                "base_url": self.ollama.base_url,
                "model": self.ollama.model,
            },
            "timeout_secs": self.timeout_secs,
            "max_tokens": self.max_tokens,
        })
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

// ── OpenAI ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl OpenAiConfig {
    fn from_env() -> Self {
        Self {
            api_key: env_opt("OPENAI_API_KEY"),
            base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            temperature: env_or("OPENAI_TEMPERATURE", "0.2").parse().unwrap_or(0.2),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env() -> Self {
        Self {
            base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            model: env_or("OLLAMA_MODEL", "llama3.1"),
        }
    }
}
