// src/analyze/mod.rs
//! Analysis pipeline: one generic topic analyzer driven by a `TopicConfig`,
//! plus the keyword tier in `general`.
//!
//! Order per call:
//! 1) scan every pattern over the document (in parallel for large inputs)
//! 2) extract context, categorize and score each hit
//! 3) rank by score, keep the top N
//! 4) synthesize answer / citations / raw confidence

pub mod context;
pub mod general;
pub mod rules;
pub mod scoring;
pub mod synthesis;

use anyhow::Context as _;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::analyze::context::{extract_context, CharCursor, ClauseContext};
use crate::analyze::rules::Categorizer;
use crate::analyze::scoring::MatchScorer;
use crate::analyze::synthesis::{
    apply_citation_ceiling, compose_answer, format_citations, topic_confidence, Synthesis,
};
use crate::config::{ComposeMode, EngineSection, TopicConfig};
use crate::confidence::NO_EVIDENCE_CONFIDENCE;
use crate::question::QuestionType;
use crate::result::ResponsibilityCategory;

// Re-export convenient types.
pub use crate::analyze::general::KeywordAnalyzer;

/// Placeholder usable in topic patterns.
pub const GAP_PLACEHOLDER: &str = "{gap}";

/// Any run of text inside one clause sentence: sentence punctuation is only
/// crossed when it is not followed by whitespace (so `4.2` survives), and a
/// newline only when it isn't a blank line.
pub const CLAUSE_GAP: &str = r"(?:[^.;!?\n]|[.;!?][^\s.;!?]|\n[^\n.;!?])*";

/// One pattern hit with everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMatch {
    pub context: ClauseContext,
    /// Raw regex match text.
    pub matched: String,
    pub category: ResponsibilityCategory,
    /// Match score in `0..=90`.
    pub confidence: u32,
    /// Character offset of the match in the document.
    pub index: usize,
}

/// Analyzer output before the engine validates and decorates it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis_type: QuestionType,
    pub synthesis: Synthesis,
    /// Next step that explains an empty result.
    pub no_evidence_hint: Option<String>,
    /// Used if the answer is empty after cleanup.
    pub fallback_answer: String,
}

impl AnalysisOutcome {
    pub fn no_evidence(
        analysis_type: QuestionType,
        answer: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        let answer = answer.into();
        Self {
            analysis_type,
            synthesis: Synthesis {
                answer: answer.clone(),
                answer_categories: Vec::new(),
                citations: Vec::new(),
                confidence: f64::from(NO_EVIDENCE_CONFIDENCE),
                supporting: 0,
            },
            no_evidence_hint: hint,
            fallback_answer: answer,
        }
    }

    pub fn found_evidence(&self) -> bool {
        self.synthesis.supporting > 0
    }
}

/// Seam between the engine and the two analyzer tiers.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> QuestionType;
    fn analyze(&self, document: &str) -> AnalysisOutcome;
}

/// Expand `{gap}` and compile case-insensitively.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let expanded = pattern.replace(GAP_PLACEHOLDER, CLAUSE_GAP);
    RegexBuilder::new(&expanded).case_insensitive(true).build()
}

/// One raw regex hit: byte span, char offset of the start, matched text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hit<'t> {
    pub start: usize,
    pub end: usize,
    pub index: usize,
    pub matched: &'t str,
}

/// Run `patterns` over `text`, mapping each hit through `build`. Large inputs
/// fan out one task per pattern; results are concatenated in pattern order
/// either way, so the output doesn't depend on scheduling.
pub(crate) fn scan_patterns<F>(
    patterns: &[Regex],
    text: &str,
    parallel_threshold: usize,
    build: F,
) -> Vec<ContextMatch>
where
    F: Fn(Hit<'_>) -> ContextMatch + Sync,
{
    let per_pattern = |re: &Regex| -> Vec<ContextMatch> {
        // hits of one pattern come in ascending order
        let mut cursor = CharCursor::default();
        re.find_iter(text)
            .map(|m| {
                build(Hit {
                    start: m.start(),
                    end: m.end(),
                    index: cursor.offset(text, m.start()),
                    matched: m.as_str(),
                })
            })
            .collect()
    };

    let lists: Vec<Vec<ContextMatch>> = if text.len() >= parallel_threshold {
        patterns.par_iter().map(per_pattern).collect()
    } else {
        patterns.iter().map(per_pattern).collect()
    };
    lists.into_iter().flatten().collect()
}

/// Stable sort by score descending, keep the top `n`.
pub(crate) fn rank(mut found: Vec<ContextMatch>, n: usize) -> Vec<ContextMatch> {
    found.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    found.truncate(n);
    found
}

/// Compiled form of one `TopicConfig`.
#[derive(Debug)]
pub struct TopicAnalyzer {
    kind: QuestionType,
    patterns: Vec<Regex>,
    scorer: MatchScorer,
    categorizer: Categorizer,
    radius: usize,
    compose: ComposeMode,
    answers: Vec<crate::config::AnswerCfg>,
    no_evidence_answer: String,
    no_evidence_hint: Option<String>,
    fallback_answer: String,
    top_matches: usize,
    citation_chars: usize,
    parallel_threshold: usize,
}

impl TopicAnalyzer {
    /// Compile every pattern and bonus table. Fails on the first bad regex,
    /// naming the topic and pattern.
    pub fn compile(topic: &TopicConfig, engine: &EngineSection) -> anyhow::Result<Self> {
        let patterns = topic
            .patterns
            .iter()
            .enumerate()
            .map(|(i, p)| {
                compile_pattern(p).map_err(|e| {
                    anyhow::anyhow!("topic `{}` pattern #{} `{}`: {}", topic.kind, i, p, e)
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let scorer = MatchScorer::compile(topic.base_score, topic.score_cap, &topic.bonuses)
            .with_context(|| format!("topic `{}` bonuses", topic.kind))?;

        Ok(Self {
            kind: topic.kind,
            patterns,
            scorer,
            categorizer: Categorizer::new(&topic.categories, topic.fallback),
            radius: topic.radius,
            compose: topic.compose,
            answers: topic.answers.clone(),
            no_evidence_answer: topic.no_evidence_answer.clone(),
            no_evidence_hint: topic.no_evidence_hint.clone(),
            fallback_answer: topic.fallback_answer.clone(),
            top_matches: engine.top_matches,
            citation_chars: engine.citation_chars,
            parallel_threshold: engine.parallel_threshold_bytes,
        })
    }

    fn build_match(&self, text: &str, hit: Hit<'_>) -> ContextMatch {
        let context = extract_context(text, hit.start, hit.end, self.radius);
        let category = self.categorizer.categorize_match(hit.matched, &context.clause);
        let confidence = self.scorer.score(&context.clause);
        ContextMatch {
            context,
            matched: hit.matched.to_string(),
            category,
            confidence,
            index: hit.index,
        }
    }

    /// Every hit for this topic, unranked.
    pub fn find_matches(&self, document: &str) -> Vec<ContextMatch> {
        scan_patterns(&self.patterns, document, self.parallel_threshold, |hit| {
            self.build_match(document, hit)
        })
    }
}

impl Analyzer for TopicAnalyzer {
    fn kind(&self) -> QuestionType {
        self.kind
    }

    fn analyze(&self, document: &str) -> AnalysisOutcome {
        let found = self.find_matches(document);
        debug!(target: "lease_qa", topic = %self.kind, hits = found.len(), "pattern scan done");

        if found.is_empty() {
            return AnalysisOutcome::no_evidence(
                self.kind,
                self.no_evidence_answer.clone(),
                self.no_evidence_hint.clone(),
            );
        }

        let best = rank(found, self.top_matches);
        for m in &best {
            debug!(
                target: "lease_qa",
                topic = %self.kind,
                index = m.index,
                score = m.confidence,
                category = %m.category,
                clause_ref = ?m.context.clause_ref,
                bonuses = ?self.scorer.fired_classes(&m.context.clause),
                "selected match"
            );
        }

        let (answer, answer_categories) =
            compose_answer(&best, &self.answers, self.compose, &self.fallback_answer);
        let citations = format_citations(&best, self.citation_chars);
        let confidence = apply_citation_ceiling(topic_confidence(&best), &citations);

        AnalysisOutcome {
            analysis_type: self.kind,
            synthesis: Synthesis {
                answer,
                answer_categories,
                citations,
                confidence,
                supporting: best.len(),
            },
            no_evidence_hint: None,
            fallback_answer: self.fallback_answer.clone(),
        }
    }
}
