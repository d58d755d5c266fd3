//! Local rule-based email classifier.
//!
//! Deterministic fallback used when no remote provider produced a result:
//! 1. `Normalizer::normalize()`: tokens → stems
//! 2. `KeywordTable::score()`: stems → per-category counts
//! 3. `policy::decide()`: counts → label + canned reply
//!
//! All tables are process-wide constants; a `RuleClassifier` holds no mutable
//! state and can be shared freely across concurrent requests.

pub mod keywords;
pub mod normalizer;
pub mod policy;
pub mod stemmer;
pub mod stopwords;

pub use keywords::{CategoryTag, KeywordTable, ScoreVector};
pub use normalizer::{Normalizer, NormalizerMode, NormalizerTier};

use tracing::debug;

use crate::pipeline::types::ClassificationResult;

/// Normalizer + keyword table + decision policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier {
    normalizer: Normalizer,
    keywords: KeywordTable,
}

impl RuleClassifier {
    pub fn new(normalizer: Normalizer, keywords: KeywordTable) -> Self {
        Self {
            normalizer,
            keywords,
        }
    }

    /// Classifier with the standard keyword table.
    pub fn with_mode(mode: NormalizerMode) -> Self {
        Self::new(Normalizer::new(mode), KeywordTable::standard())
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Score `text` without deciding.
    pub fn score(&self, text: &str) -> ScoreVector {
        let stems = self.normalizer.normalize(text);
        self.keywords.score(&stems)
    }

    /// Classify `text`. Always succeeds.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let scores = self.score(text);
        let result = policy::decide(&scores);
        debug!(
            tier = self.normalizer.tier().label(),
            best = policy::best_productive(&scores).map(|(tag, _)| tag.as_str()),
            nonproductive = scores.get(CategoryTag::Nonproductive),
            category = result.category.label(),
            "Rule-based classification"
        );
        result
    }
}
