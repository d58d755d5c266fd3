//! Text normalization: tokenize, drop stopwords, stem.
//!
//! Two tiers, picked once when the normalizer is built:
//!
//! - **Linguistic**: NFC + lowercase, UAX #29 word segmentation, alphabetic
//!   tokens only, Portuguese stopword removal, stemming.
//! - **Whitespace**: lowercase + whitespace split. Used when the linguistic
//!   resources fail their startup probe, or when forced by configuration.

use std::str::FromStr;

use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use super::{stemmer, stopwords};
use crate::error::ConfigError;

/// Configured normalizer behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizerMode {
    /// Probe the linguistic resources and use them if they check out.
    #[default]
    Auto,
    /// Always use the whitespace tier.
    Basic,
}

impl FromStr for NormalizerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(NormalizerMode::Auto),
            "basic" | "whitespace" => Ok(NormalizerMode::Basic),
            other => Err(ConfigError::InvalidValue {
                key: "AUTOMAIL_NORMALIZER".into(),
                message: format!("expected 'auto' or 'basic', got '{other}'"),
            }),
        }
    }
}

/// Active normalization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizerTier {
    Linguistic,
    Whitespace,
}

impl NormalizerTier {
    pub fn label(&self) -> &'static str {
        match self {
            NormalizerTier::Linguistic => "linguistic",
            NormalizerTier::Whitespace => "whitespace",
        }
    }
}

/// Turns raw email text into a sequence of stems.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    tier: NormalizerTier,
}

impl Normalizer {
    /// Build a normalizer, probing the linguistic resources when `mode` is `Auto`.
    pub fn new(mode: NormalizerMode) -> Self {
        let resources_ok = mode == NormalizerMode::Auto && linguistic_resources_available();
        let tier = select_tier(mode, resources_ok);
        debug!(tier = tier.label(), "Normalizer initialized");
        Self { tier }
    }

    /// Build a normalizer pinned to a tier, skipping the probe.
    pub fn with_tier(tier: NormalizerTier) -> Self {
        Self { tier }
    }

    pub fn tier(&self) -> NormalizerTier {
        self.tier
    }

    /// Normalize `text` into an ordered list of stems. Never fails.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        match self.tier {
            NormalizerTier::Linguistic => linguistic_tokens(text),
            NormalizerTier::Whitespace => whitespace_tokens(text),
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerMode::Auto)
    }
}

/// Tier for `mode` given the outcome of the resource probe.
fn select_tier(mode: NormalizerMode, resources_ok: bool) -> NormalizerTier {
    match mode {
        NormalizerMode::Basic => NormalizerTier::Whitespace,
        NormalizerMode::Auto if resources_ok => NormalizerTier::Linguistic,
        NormalizerMode::Auto => {
            warn!("Linguistic resources failed their probe, falling back to whitespace tokenization");
            NormalizerTier::Whitespace
        }
    }
}

fn linguistic_resources_available() -> bool {
    stopwords::len() > 0 && stemmer::self_check()
}

fn linguistic_tokens(text: &str) -> Vec<String> {
    let lowered = text.nfc().collect::<String>().to_lowercase();
    lowered
        .unicode_words()
        .filter(|word| word.chars().all(char::is_alphabetic))
        .filter(|word| !stopwords::is_stopword(word))
        .map(stemmer::stem)
        .collect()
}

fn whitespace_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linguistic() -> Normalizer {
        Normalizer::with_tier(NormalizerTier::Linguistic)
    }

    fn whitespace() -> Normalizer {
        Normalizer::with_tier(NormalizerTier::Whitespace)
    }

    #[test]
    fn failed_probe_degrades_to_whitespace_tier() {
        assert_eq!(
            select_tier(NormalizerMode::Auto, false),
            NormalizerTier::Whitespace
        );
        assert_eq!(
            select_tier(NormalizerMode::Auto, true),
            NormalizerTier::Linguistic
        );
        assert_eq!(
            select_tier(NormalizerMode::Basic, true),
            NormalizerTier::Whitespace
        );

        // The degraded tier still yields tokens.
        let degraded = Normalizer::with_tier(select_tier(NormalizerMode::Auto, false));
        assert_eq!(degraded.normalize("Reunião AMANHÃ"), vec!["reunião", "amanhã"]);
    }

    #[test]
    fn auto_mode_selects_linguistic_tier() {
        assert_eq!(Normalizer::new(NormalizerMode::Auto).tier(), NormalizerTier::Linguistic);
    }

    #[test]
    fn basic_mode_forces_whitespace_tier() {
        assert_eq!(Normalizer::new(NormalizerMode::Basic).tier(), NormalizerTier::Whitespace);
    }

    #[test]
    fn meeting_request_is_stemmed_without_stopwords() {
        let stems = linguistic().normalize("Podemos agendar uma reunião para amanhã?");
        assert_eq!(stems, vec!["pod", "agend", "reuni", "amanha"]);
    }

    #[test]
    fn punctuation_and_stopwords_are_dropped() {
        let stems = linguistic().normalize("Parabéns pela conquista, equipe!");
        assert_eq!(stems, vec!["parabem", "conqu", "equip"]);
    }

    #[test]
    fn non_alphabetic_tokens_are_dropped() {
        assert!(linguistic().normalize("12345 -- 678!! 3,14").is_empty());
        assert_eq!(linguistic().normalize("chamado 12345"), vec!["cham"]);
    }

    #[test]
    fn uppercase_input_is_lowercased() {
        assert_eq!(linguistic().normalize("AGENDAR"), vec!["agend"]);
    }

    #[test]
    fn empty_input_yields_empty_sequence() {
        assert!(linguistic().normalize("").is_empty());
        assert!(whitespace().normalize("").is_empty());
        assert!(whitespace().normalize("   \n\t").is_empty());
    }

    #[test]
    fn whitespace_tier_keeps_raw_lowercased_words() {
        let tokens = whitespace().normalize("Parabéns pela conquista, equipe!");
        assert_eq!(tokens, vec!["parabéns", "pela", "conquista,", "equipe!"]);
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("auto".parse::<NormalizerMode>().unwrap(), NormalizerMode::Auto);
        assert_eq!("".parse::<NormalizerMode>().unwrap(), NormalizerMode::Auto);
        assert_eq!(" BASIC ".parse::<NormalizerMode>().unwrap(), NormalizerMode::Basic);
        assert!("nltk".parse::<NormalizerMode>().is_err());
    }
}
