//! Demo: answer one question against an extracted lease text file and print
//! the result as JSON.
//!
//! Usage: `lease_qa_demo <lease.txt> <question...>`
//!
//! Logging is off unless `RUST_LOG` is set; `LEASE_QA_LOG_FORMAT=json` switches
//! to JSON log lines.

use anyhow::{bail, Context};
use lease_clause_qa::Engine;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return;
    };
    let json = std::env::var("LEASE_QA_LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    // logs go to stderr so stdout stays valid JSON
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op if missing.
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: lease_qa_demo <lease.txt> <question...>");
    };
    let question = args.collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        bail!("usage: lease_qa_demo <lease.txt> <question...>");
    }

    let document = std::fs::read_to_string(&path)
        .with_context(|| format!("reading lease text from {path}"))?;
    let engine = Engine::from_env().context("loading topic config")?;

    let result = engine.answer(&question, &document);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
