//! Provider cascade: remote attempts in order, then the rule-based fallback.
//!
//! **Core invariant: `analyze()` never fails.** Every provider error only
//! advances the cascade; the fallback always produces a result.
//!
//! Flow:
//! 1. Gemini (if configured)
//! 2. Hugging Face (if configured)
//! 3. `RuleClassifier::classify()`

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::classifier::RuleClassifier;
use crate::config::AppConfig;
use crate::error::LlmError;
use crate::llm::{self, Attempt, build_analysis_prompt, parse_classification};
use crate::pipeline::types::ClassificationResult;

/// Ordered remote attempts plus the local classifier.
#[derive(Debug, Clone)]
pub struct Cascade {
    attempts: Vec<Attempt>,
    fallback: RuleClassifier,
    timeout: Duration,
}

impl Cascade {
    pub fn new(attempts: Vec<Attempt>, fallback: RuleClassifier, timeout: Duration) -> Self {
        Self {
            attempts,
            fallback,
            timeout,
        }
    }

    /// Cascade with no remote providers.
    pub fn fallback_only(fallback: RuleClassifier) -> Self {
        Self::new(Vec::new(), fallback, Duration::ZERO)
    }

    /// Build the attempts for each configured provider and the fallback
    /// classifier with the configured normalizer mode.
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let attempts = llm::attempts_from_config(config)?;
        let fallback = RuleClassifier::with_mode(config.normalizer);
        Ok(Self::new(attempts, fallback, config.provider_timeout))
    }

    pub fn fallback(&self) -> &RuleClassifier {
        &self.fallback
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.attempts.iter().map(Attempt::name).collect()
    }

    /// Classify non-empty `text`.
    pub async fn analyze(&self, text: &str) -> ClassificationResult {
        if !self.attempts.is_empty() {
            let prompt = build_analysis_prompt(text);
            for attempt in &self.attempts {
                debug!(provider = attempt.name(), "Trying remote provider");
                match self.try_attempt(attempt, &prompt).await {
                    Ok(result) => {
                        info!(
                            provider = attempt.name(),
                            category = result.category.label(),
                            "Remote classification succeeded"
                        );
                        return result;
                    }
                    Err(e) => {
                        warn!(
                            provider = attempt.name(),
                            error = %e,
                            "Remote classification failed, advancing cascade"
                        );
                    }
                }
            }
        }

        let result = self.fallback.classify(text);
        info!(
            category = result.category.label(),
            "Used rule-based fallback"
        );
        result
    }

    /// One bounded call plus parsing. Malformed output is a failure like any other.
    async fn try_attempt(
        &self,
        attempt: &Attempt,
        prompt: &str,
    ) -> Result<ClassificationResult, LlmError> {
        let raw = tokio::time::timeout(self.timeout, attempt.run(prompt.to_string()))
            .await
            .map_err(|_| LlmError::Timeout {
                provider: attempt.name().to_string(),
                timeout: self.timeout,
            })??;

        parse_classification(&raw).map_err(|reason| {
            debug!(provider = attempt.name(), raw_response = %raw, "Unparsable provider output");
            LlmError::InvalidResponse {
                provider: attempt.name().to_string(),
                reason,
            }
        })
    }
}
