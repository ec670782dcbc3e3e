//! Frequency-ranked keyword extraction
//!
//! No stemming or tagging: words are lower-cased, stripped of punctuation,
//! filtered against a fixed stop-word list and ranked by how often they occur.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Default number of keywords kept per chunk
pub const DEFAULT_KEYWORD_COUNT: usize = 10;

/// Words never reported as keywords
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "in", "is", "it", "of", "for", "on", "with", "to", "by", "as", "at",
    "but", "if", "or", "so", "then", "from", "this", "that", "these", "those", "be", "are", "was",
    "were", "has", "have", "had", "do", "does", "did", "not", "will", "would", "should", "can",
    "could", "may", "might", "must",
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid punctuation regex (verified by tests)"));

/// Extract up to `count` keywords from `text`, most frequent first
///
/// Words of equal frequency keep the order in which they first appear.
///
/// # Examples
///
/// ```
/// use docuchunk::keywords::extract_keywords;
///
/// let keywords = extract_keywords("Brake pressure. Brake fluid, brake pads.", 2);
/// assert_eq!(keywords, vec!["brake", "pressure"]);
/// ```
#[must_use]
pub fn extract_keywords(text: &str, count: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");

    let mut ranked: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for word in cleaned.split_whitespace().filter(|w| is_candidate(w)) {
        match positions.get(word) {
            Some(&idx) => ranked[idx].1 += 1,
            None => {
                positions.insert(word, ranked.len());
                ranked.push((word, 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .map(|(word, _)| word.to_string())
        .collect()
}

fn is_candidate(word: &str) -> bool {
    word.chars().count() >= 3
        && !word.chars().all(|c| c.is_ascii_digit())
        && !STOP_WORDS.contains(&word)
}
