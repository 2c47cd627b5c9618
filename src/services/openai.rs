use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::config::OpenAiConfig;
use crate::engine::traits::{AckClassifier, FallbackAnswerer};
use crate::prompts;

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat-completions backend shared by plan generation, the
/// acknowledgement classifier, and fallback answering. Constructed
/// once at boot from `OpenAiConfig` and passed to every caller.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<String> {
        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        if let Some(max_tokens) = max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = temperature {
            body["temperature"] = json!(temperature);
        }

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body);
        if let Some(org) = &self.config.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await.context("chat request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!("chat backend error: {}", response.status()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("could not parse chat response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| anyhow!("chat response contained no choices"))
    }

    /// Asks the model to turn the article into utterance-plan text.
    /// The result is raw text; the parser tolerates whatever structure
    /// actually comes back.
    pub async fn generate_plan(&self, article: &str) -> Result<String> {
        self.chat(prompts::PLAN_SYSTEM_PROMPT, article, None, None)
            .await
            .context("plan generation failed")
    }
}

#[async_trait]
impl AckClassifier for OpenAiClient {
    /// Tiny deterministic call: 5 tokens, temperature 0. A failed call
    /// is "not an acknowledgement" so the input still gets answered.
    async fn is_acknowledgement(&self, utterance: &str) -> bool {
        let user = prompts::ack_user_prompt(utterance);
        match self
            .chat(prompts::ACK_SYSTEM_PROMPT, &user, Some(5), Some(0.0))
            .await
        {
            Ok(reply) => reply.contains(prompts::ACK_AFFIRMATIVE_TOKEN),
            Err(e) => {
                warn!("acknowledgement classifier unavailable: {e:#}");
                false
            }
        }
    }
}

#[async_trait]
impl FallbackAnswerer for OpenAiClient {
    async fn answer(&self, context: &str, question: &str) -> Result<String> {
        let user = prompts::fallback_user_prompt(context, question);
        self.chat(prompts::FALLBACK_SYSTEM_PROMPT, &user, Some(100), Some(0.5))
            .await
    }
}
