//! Caller side of the `generate-carousel` endpoint.
//!
//! Performs exactly one request per [`generate`](ConfigGenerator::generate)
//! call (no retries) and re-validates the returned draft, so a server that
//! drifts from the schema surfaces as [`GenerationError::MalformedResponse`].

use async_trait::async_trait;
use serde_json::Value;
use vitrine_core::generation::{
    parse_config_value, ConfigGenerator, GeneratedConfig, GenerationError, GenerationRequest,
    GenerationResult,
};

/// Path of the generator endpoint relative to the service base URL.
pub const GENERATE_PATH: &str = "/functions/v1/generate-carousel";

/// HTTP client for a running generator endpoint.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeneratorClient {
    /// * `base_url` - Service root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Interpret a response from the endpoint.
    pub fn decode(status: u16, body: &str) -> GenerationResult {
        if !(200..300).contains(&status) {
            return Err(GenerationError::from_status(status, body));
        }

        let payload: Value = serde_json::from_str(body)
            .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;
        let draft = payload
            .get("config")
            .ok_or_else(|| GenerationError::MalformedResponse("missing config".to_string()))?;
        let config = parse_config_value(draft)?;
        let explanation = payload
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(GeneratedConfig {
            config,
            explanation,
        })
    }
}

#[async_trait]
impl ConfigGenerator for GeneratorClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        request.check()?;

        let url = format!("{}{GENERATE_PATH}", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let result = Self::decode(status, &body);
        if let Err(err) = &result {
            tracing::warn!(status, error = %err, "Carousel generation request failed");
        }
        result
    }
}
