// src/advice.rs
//! Practical advice and next steps attached to every successful result.

use crate::config::AdviceRule;
use crate::result::ResponsibilityCategory;

pub const MANUAL_REVIEW_CAUTION: &str =
    "Consider reviewing the original lease document manually for complete details.";
pub const STEP_CLEARER_SCAN: &str = "Request a clearer scan of the lease document";
pub const STEP_CHECK_PAGES: &str = "Check if all pages and schedules were included";
pub const STEP_MORE_CLAUSES: &str = "Look for additional relevant clauses in the full document";
pub const STEP_SPECIALIST: &str = "Consult with a property law specialist if clarification is needed";

/// Below this, advice opens with the manual-review caution.
pub const CAUTION_BELOW: u8 = 60;
/// Below this, next steps ask for a better source document.
pub const RESCAN_BELOW: u8 = 50;

/// Tips for the first answer category that has any, plus every `always` rule.
pub fn practical_advice(
    rules: &[AdviceRule],
    confidence: u8,
    answer_categories: &[ResponsibilityCategory],
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if confidence < CAUTION_BELOW {
        out.push(MANUAL_REVIEW_CAUTION.to_string());
    }

    let by_category = answer_categories
        .iter()
        .find_map(|c| rules.iter().find(|r| r.category == Some(*c)));
    let tips = by_category
        .into_iter()
        .chain(rules.iter().filter(|r| r.always))
        .flat_map(|r| r.tips.iter());

    for tip in tips {
        if !out.iter().any(|t| t == tip) {
            out.push(tip.clone());
        }
    }
    out
}

pub fn next_steps(confidence: u8, supporting: usize) -> Vec<String> {
    let mut out = Vec::new();
    if confidence < RESCAN_BELOW {
        out.push(STEP_CLEARER_SCAN.to_string());
        out.push(STEP_CHECK_PAGES.to_string());
    }
    if supporting < 2 {
        out.push(STEP_MORE_CLAUSES.to_string());
    }
    out.push(STEP_SPECIALIST.to_string());
    out
}
