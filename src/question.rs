//! Question classification and keyword extraction.
//!
//! Classification is a fixed-priority series of substring tests on the
//! lowercased question; the first topic that matches wins and anything else
//! falls through to `General`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic a question is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Windows,
    Repairs,
    ServiceCharge,
    Alterations,
    General,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Windows => "windows",
            QuestionType::Repairs => "repairs",
            QuestionType::ServiceCharge => "service_charge",
            QuestionType::Alterations => "alterations",
            QuestionType::General => "general",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Words that turn a bare "repair" mention into a responsibility question.
const REPAIR_QUALIFIERS: &[&str] = &[
    "landlord",
    "tenant",
    "lessor",
    "lessee",
    "responsib",
    "obligation",
    "who",
];

/// Map a free-text question to its topic. Total: always returns a value.
pub fn classify(question: &str) -> QuestionType {
    let q = question.to_lowercase();

    if q.contains("window") {
        return QuestionType::Windows;
    }
    if q.contains("repair") && REPAIR_QUALIFIERS.iter().any(|w| q.contains(w)) {
        return QuestionType::Repairs;
    }
    if q.contains("service charge") || q.contains("maintenance charge") {
        return QuestionType::ServiceCharge;
    }
    if ["alter", "change", "modify", "improvement"]
        .iter()
        .any(|w| q.contains(w))
    {
        return QuestionType::Alterations;
    }

    QuestionType::General
}

/// Keywords for the general tier: lowercase whitespace tokens with edge
/// punctuation stripped, stop words and short tokens removed, first `max`
/// distinct entries in question order.
pub fn extract_keywords(question: &str, stop_words: &[String], max: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in question.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.chars().count() <= 2 || stop_words.iter().any(|s| s == &word) {
            continue;
        }
        if !out.contains(&word) {
            out.push(word);
        }
        if out.len() >= max {
            break;
        }
    }
    out
}
