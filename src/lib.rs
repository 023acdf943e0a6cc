// src/lib.rs
// Public library surface for integration tests and the demo binary.

pub mod advice;
pub mod analyze;
pub mod confidence;
pub mod config;
pub mod devlog;
pub mod engine;
pub mod quality;
pub mod question;
pub mod result;

// ---- Re-exports for stable public API ----
pub use crate::confidence::{label_for, validate_confidence, ConfidenceLabel};
pub use crate::config::{QaConfig, TopicConfig};
pub use crate::engine::Engine;
pub use crate::question::{classify, QuestionType};
pub use crate::result::{AnalysisResult, DocumentMetadata, DocumentQuality, ResponsibilityCategory};

use once_cell::sync::Lazy;

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(|| Engine::new(QaConfig::builtin()));

/// Answer `question` against extracted lease text using the built-in topic
/// table. Always returns a result; failures are reported inside it.
///
/// ```
/// let r = lease_clause_qa::analyze_document(
///     "Who is responsible for window repairs?",
///     "... Clause 4.2: The Landlord shall repair and maintain the windows and window frames ...",
/// );
/// assert!(r.confidence >= 50);
/// assert_eq!(r.analysis_type, lease_clause_qa::QuestionType::Windows);
/// ```
pub fn analyze_document(question: &str, document: &str) -> AnalysisResult {
    DEFAULT_ENGINE.answer(question, document)
}
