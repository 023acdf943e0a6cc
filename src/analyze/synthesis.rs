//! Synthesis: turn the best matches into an answer, citations and one raw
//! confidence number.
//!
//! The number produced here is NOT final; it still goes through
//! `confidence::validate_confidence` in the engine.

use crate::analyze::ContextMatch;
use crate::config::{AnswerCfg, ComposeMode};
use crate::confidence::{MAX_TOPIC_CONFIDENCE, NO_EVIDENCE_CONFIDENCE};
use crate::result::ResponsibilityCategory;

/// Bonus for more than one supporting clause in topic synthesis.
pub const CONSENSUS_BONUS: f64 = 10.0;

/// Most citations a result may carry.
pub const MAX_CITATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub answer: String,
    /// Categories the answer speaks for, in priority order.
    pub answer_categories: Vec<ResponsibilityCategory>,
    pub citations: Vec<String>,
    /// Raw, unvalidated.
    pub confidence: f64,
    pub supporting: usize,
}

/// Build the answer text from the categories present in `matches`.
pub fn compose_answer(
    matches: &[ContextMatch],
    answers: &[AnswerCfg],
    mode: ComposeMode,
    fallback_answer: &str,
) -> (String, Vec<ResponsibilityCategory>) {
    let present = |c: ResponsibilityCategory| matches.iter().any(|m| m.category == c);

    let mut sentences = Vec::new();
    let mut cats = Vec::new();
    for a in answers {
        if cats.contains(&a.category) || !present(a.category) {
            continue;
        }
        sentences.push(a.sentence.trim());
        cats.push(a.category);
        if mode == ComposeMode::First {
            break;
        }
    }

    if sentences.is_empty() {
        return (fallback_answer.to_string(), Vec::new());
    }
    (sentences.join(" "), cats)
}

/// `Clause {ref}: "{first n chars}..."` for each match that has a reference.
/// Identical strings are emitted once.
pub fn format_citations(matches: &[ContextMatch], max_chars: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in matches {
        let Some(r) = m.context.clause_ref.as_ref() else {
            continue;
        };
        let head: String = m.context.text.chars().take(max_chars).collect();
        let citation = format!("Clause {r}: \"{head}...\"");
        if !out.contains(&citation) {
            out.push(citation);
        }
        if out.len() == MAX_CITATIONS {
            break;
        }
    }
    out
}

fn average(matches: &[ContextMatch]) -> f64 {
    if matches.is_empty() {
        return 0.0;
    }
    let sum: u32 = matches.iter().map(|m| m.confidence).sum();
    f64::from(sum) / matches.len() as f64
}

/// `min(85, round(avg + 10 if n > 1))`.
pub fn topic_confidence(matches: &[ContextMatch]) -> f64 {
    if matches.is_empty() {
        return f64::from(NO_EVIDENCE_CONFIDENCE);
    }
    let bonus = if matches.len() > 1 { CONSENSUS_BONUS } else { 0.0 };
    (average(matches) + bonus).round().min(MAX_TOPIC_CONFIDENCE)
}

/// `min(cap, round(avg + per_match * n))`, the weaker keyword tier.
pub fn keyword_confidence(matches: &[ContextMatch], per_match: f64, cap: f64) -> f64 {
    if matches.is_empty() {
        return f64::from(NO_EVIDENCE_CONFIDENCE);
    }
    (average(matches) + per_match * matches.len() as f64)
        .round()
        .min(cap)
}

/// Uncited answers never rise above the no-evidence level.
pub fn apply_citation_ceiling(confidence: f64, citations: &[String]) -> f64 {
    if citations.is_empty() {
        confidence.min(f64::from(NO_EVIDENCE_CONFIDENCE))
    } else {
        confidence
    }
}
