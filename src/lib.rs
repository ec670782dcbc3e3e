//! # docuchunk
//!
//! Turns the extracted text of a specification-style document into chunks
//! sized for a language-model context window.
//!
//! ## Features
//!
//! - Structure detection: numbered, appendix, roman and upper-case section headers,
//!   table of contents and glossary sections
//! - Token-budget segmentation with word overlap between consecutive chunks
//! - Parent/child linkage from dotted section ids ("1.2" hangs under "1")
//! - Keyword ranking, keyword-driven semantic labels and glossary cross-references
//! - Regex-based cleaning of extracted text before chunking
//!
//! ## Example
//!
//! ```rust
//! use docuchunk::{Chunker, ChunkingConfig, StructuredChunker};
//!
//! let config = ChunkingConfig::new().with_context_window(1000).with_overlap(0);
//! let chunker = StructuredChunker::new(config);
//!
//! let text = "1. Introduction\nThe system shall support X.\n2. Design\nThe module interfaces with Y.";
//! let chunks = chunker.chunk(text);
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].title, "Design");
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

pub mod classify;
pub mod cleaning;
pub mod cross_ref;
pub mod error;
pub mod keywords;
pub mod pipeline;
pub mod segmenter;
pub mod structure;
pub mod tokens;
pub mod types;

pub use classify::{classify, Classification, SemanticLabel};
pub use cleaning::{apply_cleaning_rules, CleaningOptions, CleaningRule, StandardRule};
pub use error::{Error, Result};
pub use pipeline::DocumentPipeline;
pub use segmenter::{Chunker, StructuredChunker};
pub use structure::{detect_header, DocumentLookups, SectionHeader};
pub use types::{chunks_to_json, chunks_to_jsonl, Chunk, ChunkMetadata};

/// Initialize the library by loading a .env file
///
/// Call this early if configuration should come from `.env` in the current
/// directory or one of its parents.
///
/// # Errors
///
/// Never fails today; a missing .env file is ignored
pub fn init() -> Result<()> {
    dotenvy::dotenv().ok();
    Ok(())
}

/// Chunk `text` with the given budget and default settings otherwise
///
/// # Examples
///
/// ```
/// let chunks = docuchunk::chunk_document("1 Scope\nbody", 100, 0);
/// assert_eq!(chunks[0].title, "Scope");
/// ```
#[must_use]
pub fn chunk_document(text: &str, context_window: usize, overlap: usize) -> Vec<Chunk> {
    let config = ChunkingConfig::new()
        .with_context_window(context_window)
        .with_overlap(overlap);
    StructuredChunker::new(config).chunk(text)
}

/// Target models with known context sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelPreset {
    Llama3,
    Claude,
    Gemini,
}

impl ModelPreset {
    /// Full context window of the model, in tokens
    #[must_use]
    pub const fn context_window(self) -> usize {
        match self {
            Self::Llama3 => 8192,
            Self::Claude => 200_000,
            Self::Gemini => 32_768,
        }
    }

    /// Recommended chunk size for the model, in tokens
    #[must_use]
    pub const fn default_chunk_size(self) -> usize {
        match self {
            Self::Llama3 => 2048,
            Self::Claude | Self::Gemini => 4096,
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Llama3 => "Llama3",
            Self::Claude => "Claude",
            Self::Gemini => "Gemini",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "llama3" | "llama" => Ok(Self::Llama3),
            "claude" => Ok(Self::Claude),
            "gemini" => Ok(Self::Gemini),
            other => Err(Error::Config(format!("unknown model preset '{other}'"))),
        }
    }
}

/// Configuration for chunking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum estimated tokens per chunk (default: 4096)
    pub context_window: usize,

    /// Overlap between consecutive chunks in estimated tokens, carried as
    /// `overlap / 4` trailing words (default: 200)
    pub overlap: usize,

    /// Keywords kept per chunk (default: 10)
    pub max_keywords: usize,

    /// Title for chunks before the first detected header; `None` yields
    /// "Chunk N"
    pub preamble_title: Option<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            context_window: ModelPreset::Gemini.default_chunk_size(),
            overlap: 200,
            max_keywords: keywords::DEFAULT_KEYWORD_COUNT,
            preamble_title: None,
        }
    }
}

impl ChunkingConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration sized for a model preset
    #[must_use]
    pub fn for_model(preset: ModelPreset) -> Self {
        Self::default().with_context_window(preset.default_chunk_size())
    }

    /// Load configuration from environment variables
    ///
    /// Loads a .env file if present. Supported variables:
    /// - `DOCUCHUNK_MODEL`: "llama3", "claude" or "gemini"; sets the context window
    /// - `DOCUCHUNK_CONTEXT_WINDOW`: tokens per chunk, overrides the model preset
    /// - `DOCUCHUNK_OVERLAP`: overlap in tokens (default: 200)
    /// - `DOCUCHUNK_MAX_KEYWORDS`: keywords per chunk (default: 10)
    /// - `DOCUCHUNK_PREAMBLE_TITLE`: title for text before the first header
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or the
    /// resulting configuration is invalid
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match env::var("DOCUCHUNK_MODEL") {
            Ok(model) => Self::for_model(model.parse()?),
            Err(_) => Self::default(),
        };

        if let Some(context_window) = env_number("DOCUCHUNK_CONTEXT_WINDOW")? {
            config.context_window = context_window;
        }
        if let Some(overlap) = env_number("DOCUCHUNK_OVERLAP")? {
            config.overlap = overlap;
        }
        if let Some(max_keywords) = env_number("DOCUCHUNK_MAX_KEYWORDS")? {
            config.max_keywords = max_keywords;
        }
        if let Ok(title) = env::var("DOCUCHUNK_PREAMBLE_TITLE") {
            config.preamble_title = Some(title).filter(|t| !t.trim().is_empty());
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce chunks
    ///
    /// # Errors
    ///
    /// Returns an error if `context_window` or `max_keywords` is zero
    pub fn validate(&self) -> Result<()> {
        if self.context_window == 0 {
            return Err(Error::Config(
                "context_window must be a positive number of tokens".to_string(),
            ));
        }
        if self.max_keywords == 0 {
            return Err(Error::Config(
                "max_keywords must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the token budget per chunk
    #[must_use]
    pub const fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    /// Set the overlap in tokens
    #[must_use]
    pub const fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the number of keywords kept per chunk
    #[must_use]
    pub const fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Set the title used before the first header
    #[must_use]
    pub fn with_preamble_title(mut self, title: impl Into<String>) -> Self {
        self.preamble_title = Some(title.into());
        self
    }
}

fn env_number(name: &str) -> Result<Option<usize>> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got '{value}'"))),
        Err(_) => Ok(None),
    }
}
