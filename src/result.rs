//! result.rs: output shape of the engine plus the responsibility categories
//! clauses are bucketed into.
//!
//! `AnalysisResult` is the only thing callers ever see. It serializes to a flat
//! camelCase JSON object so a request layer can forward it untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::confidence::{label_for, ConfidenceLabel};
use crate::question::QuestionType;

/// Semantic bucket a matched clause falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponsibilityCategory {
    LandlordResponsibility,
    TenantResponsibility,
    StructuralElement,
    DemiseDefinition,
    ServiceChargeFunded,
    GeneralRepair,
    KeywordMatch,
    Unclear,
}

impl ResponsibilityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponsibilityCategory::LandlordResponsibility => "landlord_responsibility",
            ResponsibilityCategory::TenantResponsibility => "tenant_responsibility",
            ResponsibilityCategory::StructuralElement => "structural_element",
            ResponsibilityCategory::DemiseDefinition => "demise_definition",
            ResponsibilityCategory::ServiceChargeFunded => "service_charge_funded",
            ResponsibilityCategory::GeneralRepair => "general_repair",
            ResponsibilityCategory::KeywordMatch => "keyword_match",
            ResponsibilityCategory::Unclear => "unclear",
        }
    }
}

impl fmt::Display for ResponsibilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse extraction quality of the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentQuality {
    Good,
    Fair,
    Poor,
}

/// Diagnostic block attached by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub extracted_chars: usize,
    pub quality: DocumentQuality,
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Final answer for one `(question, document)` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub answer: String,
    /// Validated, always within `0..=100`.
    pub confidence: u8,
    pub confidence_label: ConfidenceLabel,
    /// At most three `Clause {ref}: "..."` strings.
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub practical_advice: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    pub analysis_type: QuestionType,
    pub supporting_clauses: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Result with a validated confidence; the label is derived from it.
    pub fn new(analysis_type: QuestionType, answer: impl Into<String>, confidence: u8) -> Self {
        Self {
            answer: answer.into(),
            confidence,
            confidence_label: label_for(confidence),
            citations: Vec::new(),
            practical_advice: Vec::new(),
            next_steps: Vec::new(),
            analysis_type,
            supporting_clauses: 0,
            document_metadata: None,
            error: None,
        }
    }

    /// Terminal result for an unrecoverable processing failure.
    pub fn failed(analysis_type: QuestionType, error: impl Into<String>) -> Self {
        Self {
            answer: "Unable to analyze the lease document. Please ensure the file is clear and readable."
                .to_string(),
            confidence: 0,
            confidence_label: ConfidenceLabel::Failed,
            citations: Vec::new(),
            practical_advice: Vec::new(),
            next_steps: vec![
                "Try uploading a higher quality scan or different file format.".to_string(),
            ],
            analysis_type,
            supporting_clauses: 0,
            document_metadata: None,
            error: Some(error.into()),
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_supporting_clauses(mut self, n: usize) -> Self {
        self.supporting_clauses = n;
        self
    }

    pub fn with_advice(mut self, advice: Vec<String>) -> Self {
        self.practical_advice = advice;
        self
    }

    pub fn with_next_steps(mut self, steps: Vec<String>) -> Self {
        self.next_steps = steps;
        self
    }

    pub fn with_metadata(mut self, meta: DocumentMetadata) -> Self {
        self.document_metadata = Some(meta);
        self
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_shape_is_flat_camel_case() {
        let r = AnalysisResult::new(QuestionType::Windows, "The landlord is responsible.", 85)
            .with_citations(vec!["Clause 4.2: \"...\"".into()])
            .with_supporting_clauses(1)
            .with_metadata(DocumentMetadata {
                extracted_chars: 120,
                quality: DocumentQuality::Fair,
                issues: vec!["No dates found".into()],
            });

        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["confidence"], json!(85));
        assert_eq!(v["confidenceLabel"], json!("High Confidence"));
        assert_eq!(v["analysisType"], json!("windows"));
        assert_eq!(v["supportingClauses"], json!(1));
        assert_eq!(v["documentMetadata"]["extractedChars"], json!(120));
        assert_eq!(v["documentMetadata"]["quality"], json!("fair"));
        assert!(v.get("error").is_none(), "error omitted when absent");
    }

    #[test]
    fn failed_result_is_terminal() {
        let r = AnalysisResult::failed(QuestionType::General, "boom");
        assert_eq!(r.confidence, 0);
        assert_eq!(r.confidence_label, ConfidenceLabel::Failed);
        assert!(r.citations.is_empty() && r.practical_advice.is_empty());
        assert_eq!(r.error.as_deref(), Some("boom"));
        assert!(!r.next_steps.is_empty());
        assert!(r.is_failure());
    }
}
