//! Example: clean and chunk a text document
//!
//! Reads extracted text from a file (or stdin), runs the cleaning rules and
//! the structured chunker, and prints the chunks as JSON.
//!
//! Run: cargo run --example chunk_document -- path/to/document.txt [--jsonl]
//!
//! Chunking settings come from the environment (see `ChunkingConfig::from_env`),
//! e.g. DOCUCHUNK_MODEL=llama3 DOCUCHUNK_OVERLAP=100.

use std::io::Read;

use anyhow::Context;
use docuchunk::{chunks_to_json, chunks_to_jsonl, ChunkingConfig, CleaningOptions, DocumentPipeline};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let jsonl = args.iter().any(|a| a == "--jsonl");
    let path = args.iter().find(|a| !a.starts_with("--"));

    let text = match path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let config = ChunkingConfig::from_env()?;
    eprintln!(
        "Chunking {} chars (window {} tokens, overlap {})",
        text.len(),
        config.context_window,
        config.overlap
    );

    let pipeline = DocumentPipeline::new(CleaningOptions::default(), config);
    let chunks = pipeline.process(&text)?;

    let output = if jsonl {
        chunks_to_jsonl(&chunks)?
    } else {
        chunks_to_json(&chunks)?
    };
    println!("{output}");

    eprintln!("✓ {} chunks", chunks.len());
    Ok(())
}
