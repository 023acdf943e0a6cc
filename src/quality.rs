// src/quality.rs
//! Heuristic extraction-quality report for `documentMetadata`.
//! Informational only; it never feeds into confidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::result::{DocumentMetadata, DocumentQuality};

/// Shorter extracts are flagged as possibly incomplete.
pub const MIN_COMPLETE_CHARS: usize = 5000;
/// Share of unexpected characters that suggests OCR noise.
pub const MAX_OCR_ERROR_RATE: f64 = 0.05;

pub const ISSUE_INCOMPLETE: &str = "Document appears incomplete";
pub const ISSUE_NOT_LEASE: &str = "May not be a lease document";
pub const ISSUE_NO_DATES: &str = "No dates found";
pub const ISSUE_NO_FINANCIAL: &str = "No financial terms found";
pub const ISSUE_OCR_NOISE: &str = "High OCR error rate detected";

static LEASE_TERMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)lease|tenancy").expect("lease terms regex"));
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").expect("year regex"));
static MONEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)£|pound").expect("money regex"));
static UNEXPECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^A-Za-z0-9_\s£.,;:()\-"']"#).expect("unexpected char regex")
});

pub fn assess_document(text: &str) -> DocumentMetadata {
    let chars = text.chars().count();
    let mut issues = Vec::new();

    if chars < MIN_COMPLETE_CHARS {
        issues.push(ISSUE_INCOMPLETE.to_string());
    }
    if !LEASE_TERMS.is_match(text) {
        issues.push(ISSUE_NOT_LEASE.to_string());
    }
    if !YEAR.is_match(text) {
        issues.push(ISSUE_NO_DATES.to_string());
    }
    if !MONEY.is_match(text) {
        issues.push(ISSUE_NO_FINANCIAL.to_string());
    }
    if chars > 0 {
        let noisy = UNEXPECTED.find_iter(text).count();
        if noisy as f64 / chars as f64 > MAX_OCR_ERROR_RATE {
            issues.push(ISSUE_OCR_NOISE.to_string());
        }
    }

    let quality = match issues.len() {
        0 => DocumentQuality::Good,
        1 | 2 => DocumentQuality::Fair,
        _ => DocumentQuality::Poor,
    };

    DocumentMetadata {
        extracted_chars: chars,
        quality,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_lease() -> String {
        let para = "This Lease is made on 1 January 2020. The Tenant shall pay £1,200 per annum. ";
        para.repeat(MIN_COMPLETE_CHARS / para.chars().count() + 1)
    }

    #[test]
    fn clean_long_lease_is_good() {
        let m = assess_document(&long_lease());
        assert_eq!(m.quality, DocumentQuality::Good, "issues: {:?}", m.issues);
        assert!(m.issues.is_empty());
        assert!(m.extracted_chars >= MIN_COMPLETE_CHARS);
    }

    #[test]
    fn short_extract_is_fair() {
        let m = assess_document("Lease dated 2021 with rent of £500.");
        assert_eq!(m.issues, vec![ISSUE_INCOMPLETE]);
        assert_eq!(m.quality, DocumentQuality::Fair);
    }

    #[test]
    fn empty_text_is_poor_without_dividing_by_zero() {
        let m = assess_document("");
        assert_eq!(m.extracted_chars, 0);
        assert_eq!(
            m.issues,
            vec![ISSUE_INCOMPLETE, ISSUE_NOT_LEASE, ISSUE_NO_DATES, ISSUE_NO_FINANCIAL]
        );
        assert_eq!(m.quality, DocumentQuality::Poor);
    }

    #[test]
    fn ocr_noise_is_flagged() {
        let m = assess_document("lease 2020 £5 ~~##@@|| ^^**%%");
        assert!(m.issues.iter().any(|i| i == ISSUE_OCR_NOISE));
    }
}
