// src/config.rs
//! Topic table schema (TOML) and loading.
//!
//! The built-in table lives in `config/topics.toml` and is embedded at compile
//! time. `QaConfig::from_env` swaps it for a file named by
//! `LEASE_QA_TOPICS_PATH`. Configs are plain values: extending one returns a
//! new config, nothing is mutated behind the engine's back.

use anyhow::{anyhow, bail, Context};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::question::QuestionType;
use crate::result::ResponsibilityCategory;

// --- env names ---
pub const ENV_TOPICS_PATH: &str = "LEASE_QA_TOPICS_PATH";
pub const ENV_PARALLEL_THRESHOLD: &str = "LEASE_QA_PARALLEL_THRESHOLD";

const BUILTIN_TOML: &str = include_str!("../config/topics.toml");

static BUILTIN: Lazy<QaConfig> = Lazy::new(|| {
    QaConfig::from_toml_str(BUILTIN_TOML).expect("valid built-in topic table")
});

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct QaConfig {
    #[serde(default)]
    pub engine: EngineSection,
    pub general: GeneralConfig,
    #[serde(default)]
    pub topics: Vec<TopicConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_top_matches")]
    pub top_matches: usize,
    #[serde(default = "default_citation_chars")]
    pub citation_chars: usize,
    /// Documents at least this long scan their patterns in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold_bytes: usize,
}

fn default_top_matches() -> usize {
    3
}
fn default_citation_chars() -> usize {
    80
}
fn default_parallel_threshold() -> usize {
    64 * 1024
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            top_matches: default_top_matches(),
            citation_chars: default_citation_chars(),
            parallel_threshold_bytes: default_parallel_threshold(),
        }
    }
}

/// Keyword tier used for questions without a topic.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub base_score: u32,
    pub score_cap: u32,
    pub confidence_cap: u32,
    /// Added once per selected match.
    pub per_match_bonus: u32,
    pub radius: usize,
    pub max_keywords: usize,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub bonuses: Vec<BonusCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicConfig {
    pub kind: QuestionType,
    pub base_score: u32,
    pub score_cap: u32,
    pub radius: usize,
    #[serde(default)]
    pub compose: ComposeMode,
    /// Category assigned when no rule matches.
    pub fallback: ResponsibilityCategory,
    pub no_evidence_answer: String,
    #[serde(default)]
    pub no_evidence_hint: Option<String>,
    pub fallback_answer: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub bonuses: Vec<BonusCfg>,
    #[serde(default)]
    pub categories: Vec<CategoryRule>,
    /// Answer sentences in priority order.
    #[serde(default)]
    pub answers: Vec<AnswerCfg>,
    #[serde(default)]
    pub advice: Vec<AdviceRule>,
}

/// How the answer is built from the categories present in the best matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeMode {
    /// Sentence of the highest-priority category only.
    #[default]
    First,
    /// Every present category's sentence, in priority order.
    All,
}

/// Points added when any of `terms` appears (word-bounded, case-insensitive).
#[derive(Debug, Clone, Deserialize)]
pub struct BonusCfg {
    pub class: String,
    pub points: u32,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub category: ResponsibilityCategory,
    pub any_contains: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerCfg {
    pub category: ResponsibilityCategory,
    pub sentence: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdviceRule {
    #[serde(default)]
    pub category: Option<ResponsibilityCategory>,
    /// Emit regardless of the answer's categories.
    #[serde(default)]
    pub always: bool,
    pub tips: Vec<String>,
}

impl QaConfig {
    /// The embedded table from `config/topics.toml`.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parse and sanity-check a TOML table. Patterns are only compiled when an
    /// analyzer is built, so a bad regex surfaces per call, not here.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: QaConfig = toml::from_str(toml_str)?;

        let mut seen = HashSet::new();
        for t in &cfg.topics {
            if t.kind == QuestionType::General {
                bail!("topic kind `general` is reserved for the keyword tier");
            }
            if !seen.insert(t.kind) {
                bail!("topic `{}` is defined more than once", t.kind);
            }
        }
        if cfg.engine.top_matches == 0 {
            bail!("engine.top_matches must be at least 1");
        }

        Ok(cfg)
    }

    /// Load from an explicit file path.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow!(
                "Failed to read topic config at {}: {}",
                path.display(),
                e
            )
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing topic config {}", path.display()))
    }

    /// `$LEASE_QA_TOPICS_PATH` if set, otherwise the built-in table.
    /// `$LEASE_QA_PARALLEL_THRESHOLD` overrides the parallel scan threshold.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(ENV_TOPICS_PATH) {
            Ok(p) => Self::from_path(&PathBuf::from(p))?,
            Err(_) => Self::builtin(),
        };
        if let Some(t) = parse_threshold_env(std::env::var(ENV_PARALLEL_THRESHOLD).ok()) {
            cfg.engine.parallel_threshold_bytes = t;
        }
        Ok(cfg)
    }

    pub fn topic(&self, kind: QuestionType) -> Option<&TopicConfig> {
        self.topics.iter().find(|t| t.kind == kind)
    }

    /// New config with `topic` added, replacing any topic of the same kind.
    pub fn with_topic(&self, topic: TopicConfig) -> Self {
        let mut next = self.clone();
        next.topics.retain(|t| t.kind != topic.kind);
        next.topics.push(topic);
        next
    }
}

impl TopicConfig {
    /// New topic with an extra pattern appended to the library.
    pub fn with_pattern(&self, pattern: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.patterns.push(pattern.into());
        next
    }
}

impl Default for QaConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

// parse optional byte-count env; garbage is ignored
fn parse_threshold_env(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_topic() {
        let cfg = QaConfig::builtin();
        for kind in [
            QuestionType::Windows,
            QuestionType::Repairs,
            QuestionType::ServiceCharge,
            QuestionType::Alterations,
        ] {
            let t = cfg.topic(kind).unwrap_or_else(|| panic!("missing topic {kind}"));
            assert!(!t.patterns.is_empty());
            assert!(t.score_cap <= 90);
        }
        assert!(cfg.topic(QuestionType::General).is_none());
        assert_eq!(cfg.engine.top_matches, 3);
        assert_eq!(cfg.general.confidence_cap, 75);
    }

    #[test]
    fn builtin_windows_matches_known_weights() {
        let cfg = QaConfig::builtin();
        let w = cfg.topic(QuestionType::Windows).unwrap();
        assert_eq!(w.base_score, 30);
        assert_eq!(w.radius, 150);
        assert_eq!(w.compose, ComposeMode::First);
        let modal = w.bonuses.iter().find(|b| b.class == "modal").unwrap();
        assert_eq!(modal.points, 25);
        assert_eq!(
            w.categories[0].category,
            ResponsibilityCategory::LandlordResponsibility
        );
    }

    #[test]
    fn rejects_general_topic_and_duplicates() {
        let general = r#"
[general]
base_score = 25
score_cap = 80
confidence_cap = 75
per_match_bonus = 5
radius = 200
max_keywords = 5

[[topics]]
kind = "general"
base_score = 1
score_cap = 1
radius = 1
fallback = "unclear"
no_evidence_answer = "x"
fallback_answer = "y"
patterns = []
"#;
        assert!(QaConfig::from_toml_str(general).is_err());

        let dup = general.replace("kind = \"general\"", "kind = \"windows\"")
            + r#"
[[topics]]
kind = "windows"
base_score = 1
score_cap = 1
radius = 1
fallback = "unclear"
no_evidence_answer = "x"
fallback_answer = "y"
patterns = []
"#;
        let err = QaConfig::from_toml_str(&dup).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn extending_returns_a_new_value() {
        let base = QaConfig::builtin();
        let windows = base.topic(QuestionType::Windows).unwrap();
        let n = windows.patterns.len();

        let extended = windows.with_pattern("skylights?");
        let cfg2 = base.with_topic(extended);

        assert_eq!(base.topic(QuestionType::Windows).unwrap().patterns.len(), n);
        assert_eq!(cfg2.topic(QuestionType::Windows).unwrap().patterns.len(), n + 1);
        assert_eq!(cfg2.topics.len(), base.topics.len());
    }

    #[test]
    fn threshold_env_parsing() {
        assert_eq!(parse_threshold_env(Some(" 1024 ".into())), Some(1024));
        assert_eq!(parse_threshold_env(Some("lots".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }
}
