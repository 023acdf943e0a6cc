//! # Lease Q&A Engine
//! Pure, synchronous orchestration: `(question, document)` → `AnalysisResult`.
//! No I/O beyond logging; the only shared state is an immutable `QaConfig`.
//!
//! Flow: classify → compile analyzer → analyze → clean answer → validate
//! confidence → advice / next steps → document metadata. Any error (or panic)
//! is converted to the failure result exactly once, in `Engine::answer`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

use crate::advice::{next_steps, practical_advice};
use crate::analyze::{AnalysisOutcome, Analyzer, KeywordAnalyzer, TopicAnalyzer};
use crate::config::{AdviceRule, QaConfig};
use crate::confidence::validate_confidence;
use crate::devlog::AnalysisEvent;
use crate::quality::assess_document;
use crate::question::{classify, QuestionType};
use crate::result::AnalysisResult;

static JSON_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```json\s*\{.*?\}\s*```").expect("json fence regex"));

/// Remove fenced JSON blocks from generated text. `None` if nothing is left.
pub fn strip_artifacts(answer: &str) -> Option<String> {
    let cleaned = JSON_FENCE.replace_all(answer, "");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    cfg: QaConfig,
}

impl Engine {
    pub fn new(cfg: QaConfig) -> Self {
        Self { cfg }
    }

    /// Engine over `QaConfig::from_env()`.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(QaConfig::from_env()?))
    }

    pub fn config(&self) -> &QaConfig {
        &self.cfg
    }

    /// Answer `question` against `document`. Never fails: processing errors
    /// come back as a result with confidence 0 and `error` set.
    pub fn answer(&self, question: &str, document: &str) -> AnalysisResult {
        let analysis_type = classify(question);
        debug!(target: "lease_qa", %analysis_type, chars = document.len(), "question classified");

        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            self.try_answer(analysis_type, question, document)
        }));

        let err = match run {
            Ok(Ok(result)) => return result,
            Ok(Err(e)) => format!("{e:#}"),
            Err(payload) => panic_message(payload.as_ref()),
        };
        error!(target: "lease_qa", %analysis_type, error = %err, "lease analysis failed");
        AnalysisEvent::failed(document, analysis_type).emit();
        AnalysisResult::failed(analysis_type, err)
    }

    /// Analyzer for a classified question: the topic table if one is
    /// configured, the keyword tier otherwise.
    pub fn analyzer_for(
        &self,
        analysis_type: QuestionType,
        question: &str,
    ) -> anyhow::Result<Box<dyn Analyzer>> {
        match self.cfg.topic(analysis_type) {
            Some(topic) => Ok(Box::new(TopicAnalyzer::compile(topic, &self.cfg.engine)?)),
            None => Ok(Box::new(KeywordAnalyzer::compile(
                question,
                &self.cfg.general,
                &self.cfg.engine,
            )?)),
        }
    }

    fn advice_rules(&self, kind: QuestionType) -> &[AdviceRule] {
        self.cfg
            .topic(kind)
            .map(|t| t.advice.as_slice())
            .unwrap_or(&[])
    }

    fn try_answer(
        &self,
        analysis_type: QuestionType,
        question: &str,
        document: &str,
    ) -> anyhow::Result<AnalysisResult> {
        let analyzer = self.analyzer_for(analysis_type, question)?;
        debug!(target: "lease_qa", %analysis_type, analyzer = %analyzer.kind(), "analyzer compiled");
        let AnalysisOutcome {
            analysis_type: kind,
            synthesis,
            no_evidence_hint,
            fallback_answer,
        } = analyzer.analyze(document);

        let answer = strip_artifacts(&synthesis.answer).unwrap_or(fallback_answer);
        let confidence = validate_confidence(synthesis.confidence);

        let advice = practical_advice(
            self.advice_rules(kind),
            confidence,
            &synthesis.answer_categories,
        );
        let mut steps: Vec<String> = no_evidence_hint.into_iter().collect();
        steps.extend(next_steps(confidence, synthesis.supporting));

        AnalysisEvent {
            event: "answered",
            document,
            analysis_type: kind,
            confidence,
            supporting: synthesis.supporting,
            citations: synthesis.citations.len(),
        }
        .emit();

        Ok(AnalysisResult::new(kind, answer, confidence)
            .with_citations(synthesis.citations)
            .with_supporting_clauses(synthesis.supporting)
            .with_advice(advice)
            .with_next_steps(steps)
            .with_metadata(assess_document(document)))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("analysis panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("analysis panicked: {s}")
    } else {
        "analysis panicked".to_string()
    }
}
