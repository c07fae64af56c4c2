//! Language-model gateway client.
//!
//! Wraps an OpenAI-compatible `POST /chat/completions` endpoint using
//! [`reqwest`]. [`GatewayGenerator`] layers the carousel prompt and output
//! parsing on top and implements [`ConfigGenerator`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vitrine_core::generation::{
    build_system_prompt, explain, parse_generated_config, ConfigGenerator, GeneratedConfig,
    GenerationError, GenerationRequest, GenerationResult,
};

/// Default model requested from the gateway.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Sampling temperature for configuration drafts. Kept low so output sticks
/// to the schema.
const DRAFT_TEMPERATURE: f32 = 0.2;

/// Connection settings for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, e.g. `https://ai.gateway.example/v1`.
    pub base_url: String,
    /// Bearer token. Requests are sent unauthenticated when `None`.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// OpenAI-compatible chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The subset of the completion response that is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it has any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}

/// Errors from the gateway HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway rate limit exceeded")]
    RateLimited,

    #[error("Gateway credits exhausted")]
    PaymentRequired,

    /// Any other non-2xx status.
    #[error("Gateway API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Gateway returned no completion text")]
    EmptyCompletion,
}

impl GatewayError {
    /// Classify a non-success status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => Self::RateLimited,
            402 => Self::PaymentRequired,
            _ => Self::Api { status, body },
        }
    }
}

impl From<GatewayError> for GenerationError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimited => Self::RateLimited,
            GatewayError::PaymentRequired => Self::QuotaExceeded,
            GatewayError::EmptyCompletion => {
                Self::MalformedResponse("empty completion".to_string())
            }
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// HTTP client for the language-model gateway.
#[derive(Debug, Clone)]
pub struct AiGatewayClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl AiGatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Send a system + user exchange and return the completion text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: Some(DRAFT_TEMPERATURE),
        };
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        tracing::debug!(%url, model = %request.model, "Sending chat completion request");

        let mut builder = self.client.post(&url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }
        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Gateway returned error");
            return Err(GatewayError::from_status(status.as_u16(), body));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .first_content()
            .map(str::to_string)
            .ok_or(GatewayError::EmptyCompletion)
    }
}

/// Generates carousel drafts through the gateway.
#[derive(Debug, Clone)]
pub struct GatewayGenerator {
    client: AiGatewayClient,
}

impl GatewayGenerator {
    pub fn new(client: AiGatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigGenerator for GatewayGenerator {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        request.check()?;

        let system = build_system_prompt(request);
        let raw = self.client.complete(&system, request.prompt.trim()).await?;

        let config = parse_generated_config(&raw).map_err(|err| {
            // Full diagnostic stays in the logs; callers only see the
            // generic invalid-format message.
            tracing::warn!(error = %err, raw = %raw, "Model output rejected");
            err
        })?;

        tracing::info!(
            domain = %config.domain,
            carousel_type = %config.carousel_type,
            "Generated carousel draft",
        );
        Ok(GeneratedConfig {
            explanation: explain(&config),
            config,
        })
    }
}
