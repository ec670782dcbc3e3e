//! Keyword-driven semantic classification of chunk content

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category assigned to a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticLabel {
    #[serde(rename = "Functional Requirement")]
    FunctionalRequirement,
    #[serde(rename = "Non-Functional Requirement")]
    NonFunctionalRequirement,
    #[serde(rename = "Safety")]
    Safety,
    #[serde(rename = "Cybersecurity")]
    Cybersecurity,
    #[serde(rename = "Architecture")]
    Architecture,
    #[serde(rename = "Glossary")]
    Glossary,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl SemanticLabel {
    /// Human-readable label, identical to the serialized form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FunctionalRequirement => "Functional Requirement",
            Self::NonFunctionalRequirement => "Non-Functional Requirement",
            Self::Safety => "Safety",
            Self::Cybersecurity => "Cybersecurity",
            Self::Architecture => "Architecture",
            Self::Glossary => "Glossary",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for SemanticLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered taxonomy; the first label with a matching keyword wins
pub const TAXONOMY: &[(SemanticLabel, &[&str])] = &[
    (
        SemanticLabel::FunctionalRequirement,
        &["shall", "must", "required to"],
    ),
    (
        SemanticLabel::NonFunctionalRequirement,
        &["performance", "scalability", "reliability", "usability", "security"],
    ),
    (
        SemanticLabel::Safety,
        &["safety", "sotif", "asil", "iso 26262", "hazard", "risk"],
    ),
    (
        SemanticLabel::Cybersecurity,
        &["cybersecurity", "threat", "vulnerability", "iso 21434"],
    ),
    (
        SemanticLabel::Architecture,
        &["component", "interface", "module", "architecture", "design"],
    ),
    (
        SemanticLabel::Glossary,
        &["glossary", "abbreviations", "acronyms", "definitions"],
    ),
];

/// Result of classifying one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: SemanticLabel,

    /// Which keyword triggered the label; `None` for `Uncategorized`
    pub reason: Option<String>,
}

/// Classify `content` by case-insensitive substring match against [`TAXONOMY`]
///
/// # Examples
///
/// ```
/// use docuchunk::classify::{classify, SemanticLabel};
///
/// let result = classify("The ECU shall log every fault.");
/// assert_eq!(result.label, SemanticLabel::FunctionalRequirement);
/// assert_eq!(result.reason.as_deref(), Some("Detected based on keyword: 'shall'"));
/// ```
#[must_use]
pub fn classify(content: &str) -> Classification {
    let lowered = content.to_lowercase();

    TAXONOMY
        .iter()
        .find_map(|(label, keywords)| {
            keywords
                .iter()
                .find(|keyword| lowered.contains(*keyword))
                .map(|keyword| Classification {
                    label: *label,
                    reason: Some(format!("Detected based on keyword: '{keyword}'")),
                })
        })
        .unwrap_or(Classification {
            label: SemanticLabel::Uncategorized,
            reason: None,
        })
}
