//! Keyword tier for questions without a topic table.
//!
//! Deliberately weaker than the topic analyzers: lower base score, confidence
//! capped at 75.

use anyhow::Context as _;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::analyze::context::extract_context;
use crate::analyze::scoring::MatchScorer;
use crate::analyze::synthesis::{apply_citation_ceiling, format_citations, keyword_confidence, Synthesis};
use crate::analyze::{rank, scan_patterns, AnalysisOutcome, Analyzer, ContextMatch, Hit};
use crate::config::{EngineSection, GeneralConfig};
use crate::confidence::MAX_GENERAL_CONFIDENCE;
use crate::question::{extract_keywords, QuestionType};
use crate::result::ResponsibilityCategory;

const NO_KEYWORDS_ANSWER: &str =
    "No specific information related to your question found in the extracted lease text.";

#[derive(Debug)]
pub struct KeywordAnalyzer {
    question: String,
    keywords: Vec<String>,
    patterns: Vec<Regex>,
    scorer: MatchScorer,
    radius: usize,
    per_match_bonus: f64,
    confidence_cap: f64,
    top_matches: usize,
    citation_chars: usize,
    parallel_threshold: usize,
}

impl KeywordAnalyzer {
    pub fn compile(
        question: &str,
        cfg: &GeneralConfig,
        engine: &EngineSection,
    ) -> anyhow::Result<Self> {
        let keywords = extract_keywords(question, &cfg.stop_words, cfg.max_keywords);
        let patterns = keywords
            .iter()
            .map(|k| {
                RegexBuilder::new(&format!(r"\b{}\b", regex::escape(k)))
                    .case_insensitive(true)
                    .build()
                    .with_context(|| format!("keyword `{k}`"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        let scorer = MatchScorer::compile(cfg.base_score, cfg.score_cap, &cfg.bonuses)
            .context("general tier bonuses")?;

        Ok(Self {
            question: question.trim().to_string(),
            keywords,
            patterns,
            scorer,
            radius: cfg.radius,
            per_match_bonus: f64::from(cfg.per_match_bonus),
            confidence_cap: f64::from(cfg.confidence_cap).min(MAX_GENERAL_CONFIDENCE),
            top_matches: engine.top_matches,
            citation_chars: engine.citation_chars,
            parallel_threshold: engine.parallel_threshold_bytes,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn no_evidence_answer(&self) -> String {
        if self.question.is_empty() {
            NO_KEYWORDS_ANSWER.to_string()
        } else {
            format!(
                "No specific information about \"{}\" found in the extracted lease text.",
                self.question
            )
        }
    }

    fn build_match(&self, text: &str, hit: Hit<'_>) -> ContextMatch {
        let context = extract_context(text, hit.start, hit.end, self.radius);
        let confidence = self.scorer.score(&context.clause);
        ContextMatch {
            context,
            matched: hit.matched.to_string(),
            category: ResponsibilityCategory::KeywordMatch,
            confidence,
            index: hit.index,
        }
    }
}

impl Analyzer for KeywordAnalyzer {
    fn kind(&self) -> QuestionType {
        QuestionType::General
    }

    fn analyze(&self, document: &str) -> AnalysisOutcome {
        let found = scan_patterns(&self.patterns, document, self.parallel_threshold, |hit| {
            self.build_match(document, hit)
        });
        debug!(
            target: "lease_qa",
            keywords = ?self.keywords,
            hits = found.len(),
            "keyword scan done"
        );

        if found.is_empty() {
            let answer = self.no_evidence_answer();
            return AnalysisOutcome::no_evidence(QuestionType::General, answer, None);
        }

        let best = rank(found, self.top_matches);
        let n = best.len();
        let answer = format!(
            "The lease contains {n} relevant reference{} to your question. Review the supporting clauses for detailed information.",
            if n == 1 { "" } else { "s" }
        );
        let citations = format_citations(&best, self.citation_chars);
        let confidence = apply_citation_ceiling(
            keyword_confidence(&best, self.per_match_bonus, self.confidence_cap),
            &citations,
        );

        AnalysisOutcome {
            analysis_type: QuestionType::General,
            synthesis: Synthesis {
                answer: answer.clone(),
                answer_categories: vec![ResponsibilityCategory::KeywordMatch],
                citations,
                confidence,
                supporting: n,
            },
            no_evidence_hint: None,
            fallback_answer: answer,
        }
    }
}
