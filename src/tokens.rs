//! Token estimation from character length

/// Fixed characters-per-token ratio used for every estimate
pub const CHARS_PER_TOKEN: usize = 4;

/// Approximate the token count of `text` as `ceil(chars / 4)`
///
/// # Examples
///
/// ```
/// use docuchunk::tokens::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("abcde"), 2);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Number of trailing words carried over for an overlap given in tokens
#[must_use]
pub const fn overlap_word_count(overlap: usize) -> usize {
    overlap / CHARS_PER_TOKEN
}

/// Percentage of a model context consumed by `token_count`, capped at 100
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn context_utilization(token_count: usize, context_limit: usize) -> f64 {
    if context_limit == 0 {
        return 100.0;
    }
    (token_count as f64 / context_limit as f64 * 100.0).min(100.0)
}
