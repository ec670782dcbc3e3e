//! Structural detectors: section headers, table of contents and glossary
//!
//! All three are line-oriented pattern matchers. They are cheap syntactic
//! heuristics rather than layout-aware parsers, and each is a pure function
//! over text.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Shortest line (in chars, after trimming) considered for a header
pub const MIN_HEADER_LEN: usize = 3;

/// Longest line (in chars, after trimming) considered for a header
pub const MAX_HEADER_LEN: usize = 200;

/// Upper-case lines at or above this length are treated as prose
pub const MAX_CAPS_HEADER_LEN: usize = 80;

static NUMBERED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<id>\d+(?:\.\d+)*\.?|Appendix\s+[A-Z0-9]+|[IVXLCDM]+\.)\s*(?P<title>[A-Za-z0-9\s,'"-]{2}.*)$"#,
    )
    .expect("valid header regex (verified by tests)")
});

static SECTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)*\.?|Appendix\s+[A-Z0-9]+|[IVXLCDM]+\.)\s*")
        .expect("valid marker regex (verified by tests)")
});

static TOC_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*?)\s*[.|_]{2,}\s*[\dIVXLCDMivxlcdm]+$")
        .expect("valid toc regex (verified by tests)")
});

static GLOSSARY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<term>[A-Z0-9\s_-]{2,})(?:\s*[:–-]\s*|\s{2,})(?P<definition>.+)$")
        .expect("valid glossary regex (verified by tests)")
});

static TOC_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:table of contents|contents)")
        .expect("valid toc heading regex (verified by tests)")
});

static GLOSSARY_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:glossary|abbreviations|acronyms)")
        .expect("valid glossary heading regex (verified by tests)")
});

/// A detected section header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Dotted identifier ("1.2.3"), "Appendix A", a roman numeral, or `None`
    /// for an upper-case title line
    pub id: Option<String>,

    /// Header text with the marker removed
    pub title: String,

    /// The trimmed header line as it appeared
    pub raw: String,
}

/// Decide whether `line` is a section header
///
/// Numbered headers must not end with a period: "1. The system shall..." is
/// a requirement, not a heading.
///
/// # Examples
///
/// ```
/// use docuchunk::structure::detect_header;
///
/// let header = detect_header("2.1 Braking Interface").unwrap();
/// assert_eq!(header.id.as_deref(), Some("2.1"));
/// assert_eq!(header.title, "Braking Interface");
///
/// assert!(detect_header("1. The system shall brake.").is_none());
/// ```
#[must_use]
pub fn detect_header(line: &str) -> Option<SectionHeader> {
    let trimmed = line.trim();
    let len = trimmed.chars().count();
    if !(MIN_HEADER_LEN..=MAX_HEADER_LEN).contains(&len) {
        return None;
    }

    let ends_with_period = trimmed.ends_with('.');

    if !ends_with_period {
        if let Some(caps) = NUMBERED_HEADER.captures(trimmed) {
            let id = caps["id"].trim().trim_end_matches('.').to_string();
            return Some(SectionHeader {
                id: Some(id),
                title: caps["title"].trim().to_string(),
                raw: trimmed.to_string(),
            });
        }
    }

    if trimmed.to_uppercase() == trimmed && len < MAX_CAPS_HEADER_LEN && !ends_with_period {
        return Some(SectionHeader {
            id: None,
            title: trimmed.to_string(),
            raw: trimmed.to_string(),
        });
    }

    None
}

/// Remove a leading section marker ("1.2", "Appendix B", "IV.") from a title
#[must_use]
pub fn strip_section_marker(title: &str) -> &str {
    let trimmed = title.trim();
    match SECTION_MARKER.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

/// The text from the first "Table of Contents" / "Contents" line onward
#[must_use]
pub fn toc_section(text: &str) -> Option<&str> {
    TOC_START.find(text).map(|m| &text[m.start()..])
}

/// The text from the first "Glossary" / "Abbreviations" / "Acronyms" line onward
#[must_use]
pub fn glossary_section(text: &str) -> Option<&str> {
    GLOSSARY_START.find(text).map(|m| &text[m.start()..])
}

/// Parse table-of-contents entries of the form `title ..... 12`
///
/// Keys are titles with their section marker removed; values are the raw
/// entry lines. A later entry with the same title replaces an earlier one.
#[must_use]
pub fn parse_toc(text: &str) -> BTreeMap<String, String> {
    let mut toc = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        let Some(caps) = TOC_ENTRY.captures(line) else {
            continue;
        };
        let title = strip_section_marker(&caps["title"]);
        if !title.is_empty() {
            toc.insert(title.to_string(), line.to_string());
        }
    }

    toc
}

/// Parse glossary entries of the form `TERM: definition`
///
/// Accepted separators are a colon, a dash or en-dash, or a run of two or
/// more spaces. Terms must be upper-case.
#[must_use]
pub fn parse_glossary(text: &str) -> BTreeMap<String, String> {
    let mut glossary = BTreeMap::new();

    for line in text.lines() {
        let Some(caps) = GLOSSARY_ENTRY.captures(line) else {
            continue;
        };
        let term = caps["term"].trim();
        let definition = caps["definition"].trim();

        if term.chars().count() >= 2
            && term.to_uppercase() == term
            && !definition.is_empty()
        {
            glossary.insert(term.to_string(), definition.to_string());
        }
    }

    glossary
}

/// Glossary and table of contents of one document
///
/// Built once before segmentation and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentLookups {
    /// Term to definition
    pub glossary: BTreeMap<String, String>,

    /// Cleaned title to raw table-of-contents line
    pub toc: BTreeMap<String, String>,
}

impl DocumentLookups {
    /// Locate and parse the glossary and table of contents in `text`
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            glossary: glossary_section(text).map(parse_glossary).unwrap_or_default(),
            toc: toc_section(text).map(parse_toc).unwrap_or_default(),
        }
    }

    /// Raw table-of-contents line for a section title
    #[must_use]
    pub fn toc_reference(&self, title: &str) -> Option<&str> {
        self.toc.get(title).map(String::as_str)
    }
}
