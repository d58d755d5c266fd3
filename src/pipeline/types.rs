//! Shared types for the analysis pipeline.

use serde::{Deserialize, Serialize};

// ── Category ────────────────────────────────────────────────────────

/// Final label exposed to callers.
///
/// Serialized with the Portuguese business terms the frontend expects;
/// these strings are fixed and never localized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The email asks for some action or follow-up.
    #[serde(rename = "Produtivo")]
    Productive,
    /// No action needed (greetings, thanks, marketing, ...).
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Category {
    /// Wire label, as serialized.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Productive => "Produtivo",
            Category::Unproductive => "Improdutivo",
        }
    }
}

// ── Classification result ───────────────────────────────────────────

/// Reply shown when the request carried no usable text.
pub const NO_TEXT_RESPONSE: &str = "Nenhum texto fornecido para análise. Por favor cole o e-mail ou faça upload de um arquivo .txt/.pdf.";

/// Outcome of analyzing one email.
///
/// Produced once per input by either a remote provider or the rule-based
/// fallback. `suggested_response` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub suggested_response: String,
}

impl ClassificationResult {
    pub fn new(category: Category, suggested_response: impl Into<String>) -> Self {
        Self {
            category,
            suggested_response: suggested_response.into(),
        }
    }

    /// Result returned for empty input, without running any classifier.
    pub fn no_text() -> Self {
        Self::new(Category::Unproductive, NO_TEXT_RESPONSE)
    }
}
