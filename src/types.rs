//! Chunk records and their serialized form

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::classify::SemanticLabel;
use crate::tokens::{context_utilization, estimate_tokens};
use crate::Result;

/// A bounded span of document text plus derived metadata
///
/// Created once by the segmenter. Only `related_chunks` and
/// `resolved_glossary_terms` are filled in afterwards, by the
/// cross-reference pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `C1`, `C2`, ... in generation order
    pub chunk_id: String,

    pub title: String,

    /// Trimmed, never empty
    pub content: String,

    pub metadata: ChunkMetadata,
}

/// Structural placement and derived data of a chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Id of an earlier chunk this one hangs under
    pub parent_id: Option<String>,

    /// Raw header line of the enclosing section
    pub section: Option<String>,

    /// Dotted section identifier such as "1.2.3"
    pub section_id: Option<String>,

    pub keywords: Vec<String>,

    /// Parent, previous and next chunk ids, deduplicated
    pub related_chunks: Vec<String>,

    pub toc_reference: Option<String>,

    pub resolved_glossary_terms: BTreeMap<String, String>,

    pub semantic_label: SemanticLabel,

    pub semantic_label_reason: Option<String>,

    pub char_count: usize,

    pub token_count: usize,
}

impl Chunk {
    /// Recompute `char_count` and `token_count` from the content
    pub fn refresh_counts(&mut self) {
        self.metadata.char_count = self.content.chars().count();
        self.metadata.token_count = estimate_tokens(&self.content);
    }

    /// Share of a model context window this chunk occupies, in percent
    #[must_use]
    pub fn utilization(&self, context_limit: usize) -> f64 {
        context_utilization(self.metadata.token_count, context_limit)
    }

    /// Convert to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serialize chunks as one pretty-printed JSON array
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn chunks_to_json(chunks: &[Chunk]) -> Result<String> {
    Ok(serde_json::to_string_pretty(chunks)?)
}

/// Serialize chunks as JSON Lines, one compact object per line
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn chunks_to_jsonl(chunks: &[Chunk]) -> Result<String> {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str(&serde_json::to_string(chunk)?);
        out.push('\n');
    }
    Ok(out)
}
