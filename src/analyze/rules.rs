//! Responsibility categorization rules.
//!
//! Each topic carries an ordered rule list:
//! - `category`:     bucket assigned on a hit
//! - `any_contains`: match if ANY phrase appears (case- and whitespace-insensitive)
//!
//! The first matching rule wins, so party rules are listed before structural
//! ones. No hit yields the topic's fallback category.

use crate::config::CategoryRule;
use crate::result::ResponsibilityCategory;

/// Ordered rules with pre-normalized phrases.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(ResponsibilityCategory, Vec<String>)>,
    fallback: ResponsibilityCategory,
}

impl Categorizer {
    pub fn new(rules: &[CategoryRule], fallback: ResponsibilityCategory) -> Self {
        let rules = rules
            .iter()
            .map(|r| {
                let phrases = r
                    .any_contains
                    .iter()
                    .map(|p| normalize(p))
                    .filter(|p| !p.is_empty())
                    .collect();
                (r.category, phrases)
            })
            .collect();
        Self { rules, fallback }
    }

    /// Category for a single piece of text.
    pub fn categorize(&self, text: &str) -> ResponsibilityCategory {
        let t = normalize(text);
        for (cat, phrases) in &self.rules {
            if phrases.iter().any(|p| t.contains(p.as_str())) {
                return *cat;
            }
        }
        self.fallback
    }

    /// Categorize the matched text; if only the fallback comes out, look at
    /// the enclosing clause instead.
    pub fn categorize_match(&self, matched: &str, clause: &str) -> ResponsibilityCategory {
        match self.categorize(matched) {
            c if c == self.fallback => self.categorize(clause),
            c => c,
        }
    }
}

// --- internals ---

/// Lowercase and collapse whitespace runs to one space.
fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    out.trim().to_string()
}
