//! Per-match point scoring.
//!
//! score = base + Σ points of every bonus class whose terms occur, capped at
//! the topic ceiling (never above `MAX_MATCH_SCORE`). Points are unsigned, so
//! a score can't go negative.

use anyhow::Context;
use regex::{Regex, RegexBuilder};

use crate::config::BonusCfg;
use crate::confidence::MAX_MATCH_SCORE;

/// A bonus class with its term list compiled into one alternation.
#[derive(Debug)]
pub struct CompiledBonus {
    pub class: String,
    pub points: u32,
    re: Regex,
}

/// Base score, bonus table and cap for one analyzer.
#[derive(Debug)]
pub struct MatchScorer {
    base: u32,
    cap: u32,
    bonuses: Vec<CompiledBonus>,
}

/// Word-bounded alternation for a list of literal terms. Boundaries are only
/// added next to word characters, so symbols such as `£` still match.
pub fn terms_regex(terms: &[String]) -> anyhow::Result<Regex> {
    let alts = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| {
            let t = t.trim();
            let lead = if t.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            let trail = if t.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            format!("{lead}{}{trail}", regex::escape(t))
        })
        .collect::<Vec<_>>();
    if alts.is_empty() {
        // matches nothing
        return Ok(Regex::new(r"\b\B").expect("never-matching regex"));
    }
    let re = RegexBuilder::new(&format!("(?:{})", alts.join("|")))
        .case_insensitive(true)
        .build()?;
    Ok(re)
}

impl MatchScorer {
    pub fn compile(base: u32, cap: u32, bonuses: &[BonusCfg]) -> anyhow::Result<Self> {
        let bonuses = bonuses
            .iter()
            .map(|b| {
                let re = terms_regex(&b.terms)
                    .with_context(|| format!("bonus class `{}` terms", b.class))?;
                Ok(CompiledBonus {
                    class: b.class.clone(),
                    points: b.points,
                    re,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            base,
            cap: cap.min(MAX_MATCH_SCORE),
            bonuses,
        })
    }

    /// Score a piece of clause text.
    pub fn score(&self, text: &str) -> u32 {
        let mut score = self.base;
        for b in &self.bonuses {
            if b.re.is_match(text) {
                score = score.saturating_add(b.points);
            }
        }
        score.min(self.cap)
    }

    /// Bonus classes that fired, for diagnostics.
    pub fn fired_classes(&self, text: &str) -> Vec<&str> {
        self.bonuses
            .iter()
            .filter(|b| b.re.is_match(text))
            .map(|b| b.class.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus(class: &str, points: u32, terms: &[&str]) -> BonusCfg {
        BonusCfg {
            class: class.into(),
            points,
            terms: terms.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn window_scorer() -> MatchScorer {
        MatchScorer::compile(
            30,
            90,
            &[
                bonus("modal", 25, &["shall", "will", "responsible"]),
                bonus("reference", 20, &["clause", "schedule", "paragraph"]),
                bonus("party", 20, &["landlord", "tenant", "lessee", "lessor"]),
                bonus("action", 15, &["repair", "maintain", "replace"]),
                bonus("classification", 10, &["external", "internal", "structure"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn base_only_without_markers() {
        assert_eq!(window_scorer().score("the windows and window frames"), 30);
    }

    #[test]
    fn bonuses_accumulate_and_cap() {
        let s = window_scorer();
        assert_eq!(s.score("the windows shall be kept"), 55);
        assert_eq!(s.score("the Landlord shall repair the windows"), 90);
        assert_eq!(
            s.score("Clause 4.2 the Landlord shall repair the external windows"),
            90
        );
    }

    #[test]
    fn terms_are_word_bounded() {
        let s = window_scorer();
        // "willow" and "repaired" don't count
        assert_eq!(s.score("willow trees near repaired windows"), 30);
    }

    #[test]
    fn cap_never_exceeds_hard_ceiling() {
        let s = MatchScorer::compile(80, 200, &[bonus("modal", 50, &["shall"])]).unwrap();
        assert_eq!(s.score("tenant shall"), MAX_MATCH_SCORE);
    }

    #[test]
    fn symbol_terms_match_without_boundaries() {
        let re = terms_regex(&["£".to_string(), "per cent".to_string()]).unwrap();
        assert!(re.is_match("a sum of £500"));
        assert!(re.is_match("ten Per Cent"));
        assert!(!re.is_match("percentage"));
    }

    #[test]
    fn empty_terms_match_nothing() {
        let re = terms_regex(&[]).unwrap();
        assert!(!re.is_match("anything at all"));
    }

    #[test]
    fn fired_classes_lists_hits() {
        let s = window_scorer();
        assert_eq!(s.fired_classes("tenant shall"), vec!["modal", "party"]);
    }
}
