//! Remote LLM providers for Automail.
//!
//! Supports:
//! - **Gemini**: `generateContent` REST API (primary)
//! - **Hugging Face**: Inference API text generation (secondary)
//!
//! Each configured provider becomes an [`Attempt`]: a named closure from
//! prompt to generated text. The cascade only sees attempts, so tests can
//! swap in plain closures without any HTTP.

pub mod gemini;
pub mod huggingface;
pub mod prompt;

pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;
pub use prompt::{build_analysis_prompt, extract_json_object, parse_classification};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::info;

use crate::config::AppConfig;
use crate::error::LlmError;

/// Future returned by an attempt: generated text or failure.
pub type CompletionFuture = BoxFuture<'static, Result<String, LlmError>>;

type CompletionFn = dyn Fn(String) -> CompletionFuture + Send + Sync;

/// One remote classification attempt with a uniform signature.
#[derive(Clone)]
pub struct Attempt {
    name: &'static str,
    call: Arc<CompletionFn>,
}

impl Attempt {
    pub fn new<F, Fut>(name: &'static str, call: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, LlmError>> + Send + 'static,
    {
        Self {
            name,
            call: Arc::new(move |prompt| call(prompt).boxed()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Send `prompt` to the provider.
    pub fn run(&self, prompt: String) -> CompletionFuture {
        (self.call)(prompt)
    }
}

impl std::fmt::Debug for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attempt").field("name", &self.name).finish()
    }
}

/// Build the attempts for every provider that has a credential, in cascade
/// order (Gemini, then Hugging Face).
pub fn attempts_from_config(config: &AppConfig) -> Result<Vec<Attempt>, LlmError> {
    let mut attempts = Vec::new();

    if let Some(ref gemini) = config.gemini {
        let client = Arc::new(GeminiClient::new(gemini, config.provider_timeout)?);
        info!("Gemini configured (model: {})", client.model());
        attempts.push(Attempt::new(gemini::PROVIDER, move |prompt| {
            let client = Arc::clone(&client);
            async move { client.generate(&prompt).await }
        }));
    }

    if let Some(ref hf) = config.huggingface {
        let client = Arc::new(HuggingFaceClient::new(hf, config.provider_timeout)?);
        info!("Hugging Face configured (model: {})", client.model());
        attempts.push(Attempt::new(huggingface::PROVIDER, move |prompt| {
            let client = Arc::clone(&client);
            async move { client.generate(&prompt).await }
        }));
    }

    Ok(attempts)
}

/// Shared HTTP client with the provider timeout applied.
fn http_client(provider: &str, timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: format!("Failed to build HTTP client: {e}"),
        })
}

/// Map a reqwest failure onto the provider error taxonomy.
fn transport_error(provider: &str, timeout: Duration, error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout {
            provider: provider.to_string(),
            timeout,
        }
    } else {
        LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: error.to_string(),
        }
    }
}

/// Turn a non-success HTTP status into an error, keeping a short body excerpt.
async fn status_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return LlmError::AuthFailed {
            provider: provider.to_string(),
        };
    }

    let body = response.text().await.unwrap_or_default();
    let excerpt: String = body.chars().take(200).collect();
    LlmError::RequestFailed {
        provider: provider.to_string(),
        reason: format!("HTTP {status}: {excerpt}"),
    }
}
