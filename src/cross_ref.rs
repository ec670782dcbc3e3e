//! Cross-reference pass over the finished chunk list
//!
//! Relations that depend on neighbours or on the whole document can only be
//! computed once segmentation is done: adjacency links and glossary terms.

use regex::Regex;
use std::collections::BTreeMap;
use tracing::warn;

use crate::types::Chunk;

/// Glossary terms compiled into whole-word, case-sensitive matchers
#[derive(Debug, Clone, Default)]
pub struct GlossaryIndex {
    entries: Vec<(String, String, Regex)>,
}

impl GlossaryIndex {
    /// Compile one matcher per glossary term
    #[must_use]
    pub fn new(glossary: &BTreeMap<String, String>) -> Self {
        let entries = glossary
            .iter()
            .filter_map(|(term, definition)| {
                let pattern = format!(r"\b{}\b", regex::escape(term));
                match Regex::new(&pattern) {
                    Ok(re) => Some((term.clone(), definition.clone(), re)),
                    Err(e) => {
                        warn!(term = %term, error = %e, "skipping glossary term");
                        None
                    }
                }
            })
            .collect();

        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Glossary entries whose term occurs as a whole word in `content`
    #[must_use]
    pub fn resolve(&self, content: &str) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter(|(_, _, re)| re.is_match(content))
            .map(|(term, definition, _)| (term.clone(), definition.clone()))
            .collect()
    }
}

/// Parent, previous and next chunk ids for the chunk at `index`,
/// deduplicated in that order
#[must_use]
pub fn related_chunks(chunks: &[Chunk], index: usize) -> Vec<String> {
    let Some(chunk) = chunks.get(index) else {
        return Vec::new();
    };

    let parent = chunk
        .metadata
        .parent_id
        .as_ref()
        .filter(|parent| **parent != chunk.chunk_id);
    let previous = index
        .checked_sub(1)
        .and_then(|i| chunks.get(i))
        .map(|c| &c.chunk_id);
    let next = chunks.get(index + 1).map(|c| &c.chunk_id);

    let mut related: Vec<String> = Vec::with_capacity(3);
    for id in [parent, previous, next].into_iter().flatten() {
        if !related.contains(id) {
            related.push(id.clone());
        }
    }
    related
}

/// Fill `related_chunks` and `resolved_glossary_terms` on every chunk
pub fn link_chunks(chunks: &mut [Chunk], glossary: &BTreeMap<String, String>) {
    let index = GlossaryIndex::new(glossary);
    let view: &[Chunk] = chunks;
    let related: Vec<Vec<String>> = (0..view.len()).map(|i| related_chunks(view, i)).collect();

    for (chunk, related) in chunks.iter_mut().zip(related) {
        chunk.metadata.related_chunks = related;
        chunk.metadata.resolved_glossary_terms = if index.is_empty() {
            BTreeMap::new()
        } else {
            index.resolve(&chunk.content)
        };
    }
}
