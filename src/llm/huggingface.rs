//! Hugging Face Inference API client.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{http_client, status_error, transport_error};
use crate::config::ProviderConfig;
use crate::error::LlmError;

pub const PROVIDER: &str = "huggingface";

/// Generation budget requested from the hosted model.
const MAX_NEW_TOKENS: u32 = 256;

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Parameters {
    max_new_tokens: u32,
}

/// Secondary remote provider.
pub struct HuggingFaceClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl HuggingFaceClient {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: http_client(PROVIDER, timeout)?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Run text generation and return `generated_text` of the first element.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = InferenceRequest {
            inputs: prompt,
            parameters: Parameters {
                max_new_tokens: MAX_NEW_TOKENS,
            },
        };

        debug!(model = %self.model, "Hugging Face request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, self.timeout, e))?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let raw = response
            .text()
            .await
            .map_err(|e| transport_error(PROVIDER, self.timeout, e))?;
        generated_text(&raw)
    }
}

fn generated_text(raw: &str) -> Result<String, LlmError> {
    let value: Value = serde_json::from_str(raw)?;

    match value
        .get(0)
        .and_then(|first| first.get("generated_text"))
        .and_then(Value::as_str)
    {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "missing generated_text".to_string(),
        }),
    }
}
