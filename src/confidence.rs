//! Confidence validation and labelling.
//!
//! `validate_confidence` is the single gate every computed score passes
//! through before it reaches an `AnalysisResult`. Anything outside `[0, 100]`
//! or non-finite is reported and replaced by `0`; it never panics.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Fixed confidence of a no-evidence result, and the ceiling for any result
/// that carries no citations.
pub const NO_EVIDENCE_CONFIDENCE: u8 = 15;

/// Hard per-match ceiling; no single clause can claim near-certainty.
pub const MAX_MATCH_SCORE: u32 = 90;

/// Ceiling for topic synthesis.
pub const MAX_TOPIC_CONFIDENCE: f64 = 85.0;

/// Ceiling for the keyword tier.
pub const MAX_GENERAL_CONFIDENCE: f64 = 75.0;

/// Human-readable confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    #[serde(rename = "Very Low Confidence")]
    VeryLow,
    #[serde(rename = "Low Confidence")]
    Low,
    #[serde(rename = "Medium Confidence")]
    Medium,
    #[serde(rename = "High Confidence")]
    High,
    #[serde(rename = "Analysis Failed")]
    Failed,
}

impl ConfidenceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::VeryLow => "Very Low Confidence",
            ConfidenceLabel::Low => "Low Confidence",
            ConfidenceLabel::Medium => "Medium Confidence",
            ConfidenceLabel::High => "High Confidence",
            ConfidenceLabel::Failed => "Analysis Failed",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw score into `0..=100`. Out-of-range or NaN input yields 0.
pub fn validate_confidence(raw: f64) -> u8 {
    if !raw.is_finite() || !(0.0..=100.0).contains(&raw) {
        warn!(target: "lease_qa", raw, "invalid confidence value, defaulting to 0");
        return 0;
    }
    // in range, so the cast can't truncate
    raw.round() as u8
}

/// Band for an already validated confidence.
pub fn label_for(confidence: u8) -> ConfidenceLabel {
    if confidence >= 80 {
        ConfidenceLabel::High
    } else if confidence >= 60 {
        ConfidenceLabel::Medium
    } else if confidence >= 40 {
        ConfidenceLabel::Low
    } else {
        ConfidenceLabel::VeryLow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert_eq!(validate_confidence(9000.0), 0);
        assert_eq!(validate_confidence(100.01), 0);
        assert_eq!(validate_confidence(-0.5), 0);
        assert_eq!(validate_confidence(f64::NAN), 0);
        assert_eq!(validate_confidence(f64::INFINITY), 0);
        assert_eq!(validate_confidence(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn rounds_valid_values() {
        assert_eq!(validate_confidence(0.0), 0);
        assert_eq!(validate_confidence(84.5), 85);
        assert_eq!(validate_confidence(84.49), 84);
        assert_eq!(validate_confidence(100.0), 100);
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(label_for(100), ConfidenceLabel::High);
        assert_eq!(label_for(80), ConfidenceLabel::High);
        assert_eq!(label_for(79), ConfidenceLabel::Medium);
        assert_eq!(label_for(60), ConfidenceLabel::Medium);
        assert_eq!(label_for(59), ConfidenceLabel::Low);
        assert_eq!(label_for(40), ConfidenceLabel::Low);
        assert_eq!(label_for(39), ConfidenceLabel::VeryLow);
        assert_eq!(label_for(0), ConfidenceLabel::VeryLow);
    }

    #[test]
    fn label_serializes_as_display_text() {
        let v = serde_json::to_value(ConfidenceLabel::Failed).unwrap();
        assert_eq!(v, serde_json::json!("Analysis Failed"));
        assert_eq!(ConfidenceLabel::VeryLow.to_string(), "Very Low Confidence");
    }
}
