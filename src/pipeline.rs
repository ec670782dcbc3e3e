//! Cleaning followed by chunking, as one call

use tracing::debug;

use crate::cleaning::{apply_cleaning_rules, CleaningOptions};
use crate::segmenter::{Chunker, StructuredChunker};
use crate::types::Chunk;
use crate::{ChunkingConfig, Result};

/// Raw extracted text in, chunks out
#[derive(Debug, Clone, Default)]
pub struct DocumentPipeline {
    pub cleaning: CleaningOptions,
    pub config: ChunkingConfig,
}

impl DocumentPipeline {
    #[must_use]
    pub const fn new(cleaning: CleaningOptions, config: ChunkingConfig) -> Self {
        Self { cleaning, config }
    }

    /// Clean `raw_text` and chunk the result
    ///
    /// # Errors
    ///
    /// Returns an error if the chunking configuration is invalid
    pub fn process(&self, raw_text: &str) -> Result<Vec<Chunk>> {
        self.config.validate()?;

        let cleaned = apply_cleaning_rules(raw_text, &self.cleaning);
        debug!(
            raw_chars = raw_text.len(),
            cleaned_chars = cleaned.len(),
            "cleaned document"
        );

        Ok(StructuredChunker::new(self.config.clone()).chunk(&cleaned))
    }
}
