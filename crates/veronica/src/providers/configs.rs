use anyhow::{Context, Result};
use std::env;

pub const OPENAI_HOST: &str = "https://api.openai.com";
pub const OLLAMA_HOST: &str = "http://localhost:11434";

// Unified enum to wrap different provider configurations
pub enum ProviderConfig {
    OpenAi(OpenAiProviderConfig),
    Ollama(OllamaProviderConfig),
}

impl ProviderConfig {
    /// Pick a provider from VERONICA_PROVIDER (defaults to openai).
    pub fn from_env(model: &str) -> Result<Self> {
        let provider = env::var("VERONICA_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        match provider.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi(OpenAiProviderConfig::from_env(model)?)),
            "ollama" => Ok(Self::Ollama(OllamaProviderConfig::from_env(model))),
            other => anyhow::bail!("Unknown provider: {}", other),
        }
    }
}

// Define specific config structs for each provider
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OpenAiProviderConfig {
    pub fn from_env(model: &str) -> Result<Self> {
        Ok(Self {
            host: env::var("OPENAI_HOST").unwrap_or_else(|_| OPENAI_HOST.to_string()),
            api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        })
    }
}

pub struct OllamaProviderConfig {
    pub host: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl OllamaProviderConfig {
    pub fn from_env(model: &str) -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| OLLAMA_HOST.to_string()),
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}
