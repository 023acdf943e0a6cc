// src/devlog.rs
//! Dev-only anonymized analysis log.
//!
//! Emitted only when LEASE_QA_DEV_LOG=1 and the process runs as a debug
//! build or with LEASE_QA_ENV in {local,development,dev}. Raw document or
//! question text is never logged; a document shows up as a short hashed id.

use sha2::{Digest, Sha256};
use tracing::info;

use crate::question::QuestionType;

pub const ENV_DEV_LOG: &str = "LEASE_QA_DEV_LOG";
pub const ENV_RUNTIME: &str = "LEASE_QA_ENV";

const DEV_RUNTIMES: &[&str] = &["local", "development", "dev"];

/// Hex chars of the document id.
const DOC_ID_LEN: usize = 12;

fn flag_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1")
}

fn dev_runtime() -> bool {
    cfg!(debug_assertions)
        || std::env::var(ENV_RUNTIME)
            .is_ok_and(|v| DEV_RUNTIMES.contains(&v.to_ascii_lowercase().as_str()))
}

pub fn dev_logging_enabled() -> bool {
    flag_set(ENV_DEV_LOG) && dev_runtime()
}

/// Stable short id for a document: leading hex of its SHA-256.
pub fn anon_hash(text: &str) -> String {
    let mut hex = format!("{:x}", Sha256::digest(text.as_bytes()));
    hex.truncate(DOC_ID_LEN);
    hex
}

/// One analysis as seen by the dev log. Counts only, no text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AnalysisEvent<'a> {
    pub event: &'static str,
    pub document: &'a str,
    pub analysis_type: QuestionType,
    pub confidence: u8,
    pub supporting: usize,
    pub citations: usize,
}

impl AnalysisEvent<'_> {
    pub(crate) fn failed(document: &str, analysis_type: QuestionType) -> AnalysisEvent<'_> {
        AnalysisEvent {
            event: "failed",
            document,
            analysis_type,
            confidence: 0,
            supporting: 0,
            citations: 0,
        }
    }

    pub(crate) fn emit(&self) {
        if !dev_logging_enabled() {
            return;
        }
        info!(
            target: "lease_qa",
            doc = %anon_hash(self.document),
            event = self.event,
            analysis_type = %self.analysis_type,
            confidence = self.confidence,
            supporting = self.supporting,
            citations = self.citations,
            chars = self.document.chars().count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn hash_is_short_and_stable() {
        let a = anon_hash("Clause 4.2 The Landlord shall repair");
        assert_eq!(a.len(), DOC_ID_LEN);
        assert_eq!(a, anon_hash("Clause 4.2 The Landlord shall repair"));
        assert_ne!(a, anon_hash("Clause 4.3 The Landlord shall repair"));
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        // sha256("") starts e3b0c442
        assert!(anon_hash("").starts_with("e3b0c442"));
    }

    #[test]
    #[serial]
    fn gate_requires_flag() {
        std::env::remove_var(ENV_DEV_LOG);
        assert!(!dev_logging_enabled());
        std::env::set_var(ENV_DEV_LOG, "yes");
        assert!(!dev_logging_enabled());
        std::env::set_var(ENV_DEV_LOG, "1");
        if cfg!(debug_assertions) {
            assert!(dev_logging_enabled());
        }
        // emitting with the gate open must not panic
        AnalysisEvent::failed("some lease", QuestionType::Windows).emit();
        std::env::remove_var(ENV_DEV_LOG);
    }
}
