//! Single-pass segmentation of a document into chunks
//!
//! Lines are consumed once, front to back. Two events close the pending
//! buffer: a section header, or a line that would push the buffer past the
//! context window. Lines are never split, so a single oversized line becomes
//! a chunk of its own.

use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::classify::classify;
use crate::cross_ref::link_chunks;
use crate::keywords::extract_keywords;
use crate::structure::{detect_header, DocumentLookups, SectionHeader};
use crate::tokens::{overlap_word_count, CHARS_PER_TOKEN};
use crate::types::{Chunk, ChunkMetadata};
use crate::ChunkingConfig;

/// Anything that turns cleaned document text into chunks
pub trait Chunker {
    /// Split `text` into an ordered list of chunks
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Structure-aware chunker: header detection, token budget, overlap and
/// cross-referencing
#[derive(Debug, Clone, Default)]
pub struct StructuredChunker {
    config: ChunkingConfig,
}

impl StructuredChunker {
    #[must_use]
    pub const fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}

impl Chunker for StructuredChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let lookups = DocumentLookups::from_text(text);
        debug!(
            glossary_terms = lookups.glossary.len(),
            toc_entries = lookups.toc.len(),
            "built document lookups"
        );

        let mut chunks = Segmenter::new(&self.config, &lookups).run(text);
        link_chunks(&mut chunks, &lookups.glossary);

        debug!(chunks = chunks.len(), "chunking complete");
        chunks
    }
}

/// Section the segmenter is currently inside
#[derive(Debug, Clone, Default)]
struct SectionInfo {
    id: Option<String>,
    title: Option<String>,
    section: Option<String>,
    parent_id: Option<String>,
}

impl SectionInfo {
    fn enter(&mut self, header: SectionHeader) {
        self.id = header.id;
        self.title = Some(header.title);
        self.section = Some(header.raw);
        self.parent_id = None;
    }
}

/// First chunk that carried a given section id
#[derive(Debug, Clone)]
struct SectionEntry {
    section_id: String,
    chunk_id: String,
}

/// Pending lines plus their joined length, so the budget check does not
/// rejoin the buffer on every line
#[derive(Debug, Default)]
struct ContentBuffer {
    lines: Vec<String>,
    chars: usize,
}

impl ContentBuffer {
    fn push(&mut self, line: &str) {
        if !self.lines.is_empty() {
            self.chars += 1;
        }
        self.chars += line.chars().count();
        self.lines.push(line.to_string());
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Estimated tokens of the buffer joined with newlines
    fn token_estimate(&self) -> usize {
        self.chars.div_ceil(CHARS_PER_TOKEN)
    }

    /// Drain the buffer, returning its lines joined with newlines
    fn take(&mut self) -> String {
        let content = self.lines.join("\n");
        self.lines.clear();
        self.chars = 0;
        content
    }
}

/// Last `overlap / 4` whitespace-delimited words of `content`
fn overlap_tail(content: &str, overlap: usize) -> Option<String> {
    let count = overlap_word_count(overlap);
    if overlap == 0 || count == 0 {
        return None;
    }

    let words: Vec<&str> = content.split_whitespace().collect();
    let start = words.len().saturating_sub(count);
    let tail = words[start..].join(" ");

    (!tail.is_empty()).then_some(tail)
}

struct Segmenter<'a> {
    config: &'a ChunkingConfig,
    lookups: &'a DocumentLookups,
    section: SectionInfo,
    buffer: ContentBuffer,
    chunk_index: usize,
    history: Vec<SectionEntry>,
    chunks: Vec<Chunk>,
}

impl<'a> Segmenter<'a> {
    fn new(config: &'a ChunkingConfig, lookups: &'a DocumentLookups) -> Self {
        Self {
            config,
            lookups,
            section: SectionInfo {
                title: config.preamble_title.clone(),
                ..SectionInfo::default()
            },
            buffer: ContentBuffer::default(),
            chunk_index: 1,
            history: Vec::new(),
            chunks: Vec::new(),
        }
    }

    fn run(mut self, text: &str) -> Vec<Chunk> {
        for line in text.lines() {
            // headers close the buffer regardless of size
            if let Some(header) = detect_header(line) {
                self.on_header(line, header);
            } else if self.would_overflow(line) {
                self.on_overflow(line);
            } else {
                self.buffer.push(line);
            }
        }

        if !self.buffer.is_empty() {
            self.flush();
        }

        self.chunks
    }

    fn would_overflow(&self, line: &str) -> bool {
        let line_tokens = line.chars().count().div_ceil(CHARS_PER_TOKEN);
        !self.buffer.is_empty()
            && self.buffer.token_estimate() + line_tokens > self.config.context_window
    }

    fn on_header(&mut self, line: &str, header: SectionHeader) {
        let tail = if self.buffer.is_empty() {
            None
        } else {
            self.flush()
        };

        if let Some(tail) = tail {
            self.buffer.push(&tail);
        }
        self.section.enter(header);
        self.buffer.push(line);
    }

    fn on_overflow(&mut self, line: &str) {
        if let Some(tail) = self.flush() {
            self.buffer.push(&tail);
        }
        self.buffer.push(line);

        // continuation chunks hang under the section's opening chunk
        if let Some(chunk_id) = self.section_entry().map(|entry| entry.chunk_id.clone()) {
            self.section.parent_id = Some(chunk_id);
        }
    }

    /// Finalize the buffer and return the overlap tail for the next one
    fn flush(&mut self) -> Option<String> {
        let content = self.buffer.take();

        if let Some(chunk_id) = self.finalize(&content) {
            self.register_section(chunk_id);
        }

        overlap_tail(&content, self.config.overlap)
    }

    fn section_entry(&self) -> Option<&SectionEntry> {
        let id = self.section.id.as_deref()?;
        self.history.iter().find(|entry| entry.section_id == id)
    }

    /// Record the first chunk of the current section; later ones are ignored
    fn register_section(&mut self, chunk_id: String) {
        let Some(id) = self.section.id.clone() else {
            return;
        };
        if self.history.iter().all(|entry| entry.section_id != id) {
            self.history.push(SectionEntry {
                section_id: id,
                chunk_id,
            });
        }
    }

    fn resolve_parent(&mut self, title: &str) {
        match self.section.id.as_deref() {
            Some(id) => {
                let Some((parent_section, _)) = id.rsplit_once('.') else {
                    return;
                };
                if let Some(entry) = self
                    .history
                    .iter()
                    .rev()
                    .find(|entry| entry.section_id == parent_section)
                {
                    self.section.parent_id = Some(entry.chunk_id.clone());
                }
            }
            None => {
                if let Some(last) = self.chunks.last() {
                    if last.title == title {
                        self.section.parent_id.clone_from(&last.metadata.parent_id);
                    }
                }
            }
        }
    }

    /// Turn `content` into a chunk; empty content is dropped without
    /// consuming an id
    fn finalize(&mut self, content: &str) -> Option<String> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let chunk_id = format!("C{}", self.chunk_index);
        let title = self
            .section
            .title
            .clone()
            .unwrap_or_else(|| format!("Chunk {}", self.chunk_index));

        self.resolve_parent(&title);

        let classification = classify(content);
        let mut chunk = Chunk {
            chunk_id: chunk_id.clone(),
            content: content.to_string(),
            metadata: ChunkMetadata {
                parent_id: self.section.parent_id.clone(),
                section: self.section.section.clone(),
                section_id: self.section.id.clone(),
                keywords: extract_keywords(content, self.config.max_keywords),
                related_chunks: Vec::new(),
                toc_reference: self.lookups.toc_reference(&title).map(str::to_string),
                resolved_glossary_terms: BTreeMap::new(),
                semantic_label: classification.label,
                semantic_label_reason: classification.reason,
                char_count: 0,
                token_count: 0,
            },
            title,
        };
        chunk.refresh_counts();

        trace!(
            chunk_id = %chunk.chunk_id,
            section_id = ?chunk.metadata.section_id,
            tokens = chunk.metadata.token_count,
            "finalized chunk"
        );

        self.chunks.push(chunk);
        self.chunk_index += 1;
        Some(chunk_id)
    }
}
