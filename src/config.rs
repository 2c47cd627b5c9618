use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano-2025-04-14";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

/// Credentials and endpoint settings for the chat-completions backend.
/// Built once at boot; a missing API key is the one fatal startup error.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub organization: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            organization: std::env::var("OPENAI_ORGANIZATION").ok(),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}
