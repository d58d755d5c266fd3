//! Email analysis pipeline.
//!
//! Every request to `/api/analyze` flows through:
//! 1. `extract::extract_text_from_file()` (uploads only)
//! 2. Empty-text check, answered with `ClassificationResult::no_text()`
//! 3. `Cascade::analyze()`: remote providers, then the rule-based fallback
//!
//! **No error path exists past step 2.** The cascade always returns a result.

pub mod cascade;
pub mod extract;
pub mod types;

pub use cascade::Cascade;
pub use types::{Category, ClassificationResult};
