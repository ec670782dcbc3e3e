//! Find/replace cleaning applied to extracted text before chunking
//!
//! Rules are applied in order. Literal rules replace every occurrence;
//! pattern rules take JavaScript-style flags (`g`, `i`, `m`, `s`). A pattern
//! that fails to compile is logged and skipped, never fatal.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::{Error, Result};

/// Sentinel line the text extractor places between pages
pub const PAGE_BREAK: &str = "PAGE_BREAK";

pub const REMOVE_HEADERS: &str = "removeHeaders";
pub const REMOVE_FOOTERS: &str = "removeFooters";
pub const REMOVE_PAGE_NUMBERS: &str = "removePageNumbers";
pub const NORMALIZE_WHITESPACE: &str = "normalizeWhitespace";

/// Flags assumed when a pattern rule leaves them empty
const DEFAULT_FLAGS: &str = "gi";

static HORIZONTAL_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace regex (verified by tests)"));

static PAGE_BREAK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*PAGE_BREAK\s*").expect("valid page break regex (verified by tests)")
});

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n\s*){3,}").expect("valid blank line regex (verified by tests)"));

/// A single find/replace rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningRule {
    pub find: String,
    pub replace: String,
    pub is_regex: bool,
    /// Pattern flags; ignored for literal rules
    #[serde(default)]
    pub flags: String,
}

impl CleaningRule {
    /// Literal find/replace
    #[must_use]
    pub fn literal(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            is_regex: false,
            flags: String::new(),
        }
    }

    /// Pattern find/replace with flags such as `"gm"`
    #[must_use]
    pub fn pattern(
        find: impl Into<String>,
        replace: impl Into<String>,
        flags: impl Into<String>,
    ) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            is_regex: true,
            flags: flags.into(),
        }
    }

    fn effective_flags(&self) -> &str {
        if self.flags.is_empty() {
            DEFAULT_FLAGS
        } else {
            &self.flags
        }
    }

    /// Build the regex for a pattern rule
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` if the pattern does not compile
    pub fn compile(&self) -> Result<Regex> {
        let flags = self.effective_flags();
        RegexBuilder::new(&self.find)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: self.find.clone(),
                source,
            })
    }

    /// Apply this rule to `text`
    ///
    /// Rules with an empty `find` and patterns that fail to compile leave the
    /// text untouched.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        if self.find.is_empty() {
            return text.to_string();
        }
        if !self.is_regex {
            return text.replace(&self.find, &self.replace);
        }

        match self.compile() {
            Ok(re) if self.effective_flags().contains('g') => {
                re.replace_all(text, self.replace.as_str()).into_owned()
            }
            Ok(re) => re.replace(text, self.replace.as_str()).into_owned(),
            Err(e) => {
                warn!(error = %e, "skipping invalid cleaning rule");
                text.to_string()
            }
        }
    }
}

/// A named built-in rule that can be switched on and off
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardRule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    #[serde(flatten)]
    pub rule: CleaningRule,
}

impl StandardRule {
    fn new(id: &str, name: &str, rule: CleaningRule) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
            rule,
        }
    }
}

/// Built-in and user rules applied before chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    pub standard_rules: Vec<StandardRule>,
    #[serde(default)]
    pub custom_rules: Vec<CleaningRule>,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            standard_rules: vec![
                // header/footer removal needs cross-page context; kept as switches only
                StandardRule::new(
                    REMOVE_HEADERS,
                    "Remove Repeating Headers (placeholder)",
                    CleaningRule::default(),
                ),
                StandardRule::new(
                    REMOVE_FOOTERS,
                    "Remove Repeating Footers (placeholder)",
                    CleaningRule::default(),
                ),
                StandardRule::new(
                    REMOVE_PAGE_NUMBERS,
                    "Remove \"Page X of Y\"",
                    CleaningRule::pattern(r"^Page\s+\d+(\s+of\s+\d+)?$", "", "gm"),
                ),
                StandardRule::new(
                    NORMALIZE_WHITESPACE,
                    "Normalize Whitespace",
                    CleaningRule::default(),
                ),
            ],
            custom_rules: Vec::new(),
        }
    }
}

impl CleaningOptions {
    /// Append a user rule, applied after the standard rules
    #[must_use]
    pub fn with_custom_rule(mut self, rule: CleaningRule) -> Self {
        self.custom_rules.push(rule);
        self
    }

    /// Enable or disable a standard rule by id; unknown ids are ignored
    #[must_use]
    pub fn with_standard_rule(mut self, id: &str, enabled: bool) -> Self {
        if let Some(rule) = self.standard_rules.iter_mut().find(|r| r.id == id) {
            rule.enabled = enabled;
        }
        self
    }

    fn is_enabled(&self, id: &str) -> bool {
        self.standard_rules.iter().any(|r| r.id == id && r.enabled)
    }
}

/// Collapse whitespace runs, drop page-break markers and excess blank lines
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let text = HORIZONTAL_RUNS.replace_all(text, " ");
    let text = text.replace("\r\n", "\n");
    let text = PAGE_BREAK_LINES.replace_all(&text, "");
    BLANK_RUNS.replace_all(&text, "\n\n").into_owned()
}

/// Apply every enabled standard rule, then the custom rules, then whitespace
/// normalization if enabled; the result is trimmed
///
/// # Examples
///
/// ```
/// use docuchunk::cleaning::{apply_cleaning_rules, CleaningOptions};
///
/// let raw = "Intro   text\nPage 3 of 9\n\nPAGE_BREAK\n\nMore";
/// let cleaned = apply_cleaning_rules(raw, &CleaningOptions::default());
/// assert_eq!(cleaned, "Intro text\nMore");
/// ```
#[must_use]
pub fn apply_cleaning_rules(text: &str, options: &CleaningOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut cleaned = text.to_string();

    for standard in options
        .standard_rules
        .iter()
        .filter(|r| r.enabled && r.id != NORMALIZE_WHITESPACE)
    {
        cleaned = standard.rule.apply(&cleaned);
    }

    for rule in &options.custom_rules {
        cleaned = rule.apply(&cleaned);
    }

    if options.is_enabled(NORMALIZE_WHITESPACE) {
        cleaned = normalize_whitespace(&cleaned);
    }

    cleaned.trim().to_string()
}
