//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::classifier::NormalizerMode;
use crate::error::ConfigError;

/// Default per-call timeout for remote providers.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 20;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HF_MODEL: &str = "google/flan-t5-small";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Credentials and endpoint for one remote provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Primary provider; `None` when `GEMINI_API_KEY` is unset.
    pub gemini: Option<ProviderConfig>,
    /// Secondary provider; `None` when `HF_API_KEY` is unset.
    pub huggingface: Option<ProviderConfig>,
    /// Timeout applied to each remote call.
    pub provider_timeout: Duration,
    pub normalizer: NormalizerMode,
    pub port: u16,
    /// Allowed CORS origin, `*` for any.
    pub frontend_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: None,
            huggingface: None,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            normalizer: NormalizerMode::Auto,
            port: DEFAULT_PORT,
            frontend_url: "*".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let gemini = get("GEMINI_API_KEY").map(|key| ProviderConfig {
            api_key: SecretString::from(key),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        });

        let huggingface = get("HF_API_KEY").map(|key| ProviderConfig {
            api_key: SecretString::from(key),
            model: get("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_string()),
            base_url: get("HF_API_BASE").unwrap_or_else(|| DEFAULT_HF_BASE_URL.to_string()),
        });

        let provider_timeout_secs: u64 = parse_or(
            "AUTOMAIL_PROVIDER_TIMEOUT_SECS",
            get("AUTOMAIL_PROVIDER_TIMEOUT_SECS"),
            DEFAULT_PROVIDER_TIMEOUT_SECS,
        )?;
        if provider_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "AUTOMAIL_PROVIDER_TIMEOUT_SECS".into(),
                message: "must be greater than zero".into(),
            });
        }

        let normalizer = match get("AUTOMAIL_NORMALIZER") {
            Some(value) => value.parse()?,
            None => NormalizerMode::Auto,
        };

        let port = parse_or("AUTOMAIL_PORT", get("AUTOMAIL_PORT"), DEFAULT_PORT)?;
        let frontend_url = get("FRONTEND_URL").unwrap_or_else(|| "*".to_string());

        Ok(Self {
            gemini,
            huggingface,
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            normalizer,
            port,
            frontend_url,
        })
    }

    /// Names of the configured remote providers, in cascade order.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        let mut providers = Vec::new();
        if self.gemini.is_some() {
            providers.push("gemini");
        }
        if self.huggingface.is_some() {
            providers.push("huggingface");
        }
        providers
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}
