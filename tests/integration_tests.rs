//! Integration tests for the chunking library

use std::collections::HashSet;
use std::fs;

use docuchunk::tokens::estimate_tokens;
use docuchunk::{
    chunk_document, chunks_to_json, detect_header, Chunk, ChunkingConfig, CleaningOptions,
    DocumentPipeline, SemanticLabel,
};

const FIXTURE: &str = "tests/fixtures/brake_controller_spec.txt";

fn load_fixture() -> String {
    fs::read_to_string(FIXTURE).expect("Should be able to read fixture document")
}

fn process_fixture() -> Vec<Chunk> {
    let pipeline = DocumentPipeline::new(
        CleaningOptions::default(),
        ChunkingConfig::new().with_context_window(1000).with_overlap(0),
    );
    pipeline
        .process(&load_fixture())
        .expect("Pipeline should accept a valid config")
}

/// A document mixing headers, short lines and long lines
fn mixed_document() -> String {
    let mut text = String::from("PRODUCT OVERVIEW\nThis product controls braking.\n");
    for section in 1..=4 {
        text.push_str(&format!("{section} Section {section}\n"));
        for sub in 1..=3 {
            text.push_str(&format!("{section}.{sub} Subsection {section} {sub}\n"));
            for line in 0..6 {
                let words = 3 + (section * 7 + sub * 5 + line * 3) % 25;
                let body: Vec<String> = (0..words).map(|w| format!("word{w}")).collect();
                text.push_str(&body.join(" "));
                text.push('\n');
            }
        }
    }
    text
}

fn chunk_number(id: &str) -> usize {
    id.strip_prefix('C')
        .and_then(|n| n.parse().ok())
        .expect("chunk ids look like C<n>")
}

#[test]
fn test_two_section_scenario() {
    let text = "1. Introduction\nThe system shall support X.\n2. Design\nThe module interfaces with Y.";
    let chunks = chunk_document(text, 1000, 0);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].title, "Introduction");
    assert_eq!(chunks[1].title, "Design");
    assert_eq!(
        chunks[0].metadata.semantic_label,
        SemanticLabel::FunctionalRequirement
    );
    assert_eq!(
        chunks[0].metadata.semantic_label_reason.as_deref(),
        Some("Detected based on keyword: 'shall'")
    );
    assert_eq!(chunks[1].metadata.semantic_label, SemanticLabel::Architecture);
    assert_eq!(chunks[0].metadata.section_id.as_deref(), Some("1"));
    assert_eq!(chunks[1].metadata.section_id.as_deref(), Some("2"));
    assert_eq!(chunks[0].metadata.parent_id, None);
    assert_eq!(chunks[1].metadata.parent_id, None);
    assert_eq!(chunks[0].metadata.related_chunks, vec!["C2"]);
    assert_eq!(chunks[1].metadata.related_chunks, vec!["C1"]);
}

#[test]
fn test_single_oversized_line() {
    let text = "z".repeat(5000);
    let chunks = chunk_document(&text, 10, 0);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, text);
    assert_eq!(chunks[0].metadata.token_count, 1250);
}

#[test]
fn test_budget_overflow_within_section() {
    let line = "q".repeat(200); // 50 tokens
    let text = format!("1 Scope\n{line}\n{line}");
    let chunks = chunk_document(&text, 60, 0);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].metadata.section_id.as_deref(), Some("1"));
    assert_eq!(chunks[1].metadata.section_id.as_deref(), Some("1"));
    assert_eq!(chunks[1].metadata.parent_id.as_deref(), Some(chunks[0].chunk_id.as_str()));
    assert_eq!(chunks[1].metadata.related_chunks, vec!["C1"]);
}

#[test]
fn test_overlap_is_word_suffix_of_previous_buffer() {
    let words: Vec<String> = (0..150).map(|i| format!("token{i}")).collect();
    let text = format!("1 Alpha\n{}\n2 Beta\nclosing line", words.join(" "));
    let chunks = chunk_document(&text, 10_000, 400);

    assert_eq!(chunks.len(), 2);

    let previous: Vec<&str> = chunks[0].content.split_whitespace().collect();
    let expected_tail = previous[previous.len() - 100..].join(" ");
    assert_eq!(expected_tail.split(' ').next(), Some("token50"));
    assert!(chunks[1]
        .content
        .starts_with(&format!("{expected_tail}\n2 Beta")));
}

#[test]
fn test_glossary_resolution() {
    let text = "1 Interfaces\nThe API is versioned.\nAPIs are not matched.\n\nGlossary\nAPI: Application Programming Interface";
    let chunks = chunk_document(text, 1000, 0);

    let first = &chunks[0];
    assert_eq!(
        first.metadata.resolved_glossary_terms.get("API").map(String::as_str),
        Some("Application Programming Interface")
    );

    let unrelated = chunk_document("1 Other\nNo acronyms here at all", 1000, 0);
    assert!(unrelated[0].metadata.resolved_glossary_terms.is_empty());
}

#[test]
fn test_fixture_structure() {
    let chunks = process_fixture();

    let titles: Vec<&str> = chunks.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "BRAKE CONTROLLER SOFTWARE REQUIREMENTS",
            "Introduction ........ 1",
            "Purpose ........ 1",
            "Requirements ........ 2",
            "Safety Goals ........ 3",
            "GLOSSARY ........ 9",
            "Introduction",
            "Purpose",
            "Requirements",
            "Safety Goals",
            "GLOSSARY",
        ]
    );

    // contents lines open their sections too
    let section_ids: Vec<Option<&str>> = chunks
        .iter()
        .map(|c| c.metadata.section_id.as_deref())
        .collect();
    assert_eq!(
        section_ids,
        vec![
            None,
            Some("1"),
            Some("1.1"),
            Some("2"),
            Some("2.1"),
            None,
            Some("1"),
            Some("1.1"),
            Some("2"),
            Some("2.1"),
            None,
        ]
    );

    // sections are registered on first sight, so body subsections hang
    // under the contents chunks
    let parents: Vec<Option<&str>> = chunks
        .iter()
        .map(|c| c.metadata.parent_id.as_deref())
        .collect();
    assert_eq!(
        parents,
        vec![
            None,
            None,
            Some("C2"),
            None,
            Some("C4"),
            None,
            None,
            Some("C2"),
            None,
            Some("C4"),
            None,
        ]
    );

    assert!(chunks.iter().all(|c| !c.content.contains("PAGE_BREAK")));
    assert!(chunks.iter().all(|c| !c.content.contains("Page 1 of 3")));
    assert_eq!(
        chunks[0].content,
        "BRAKE CONTROLLER SOFTWARE REQUIREMENTS\nTable of Contents"
    );
    assert_eq!(chunks[1].content, "1 Introduction ........ 1");
    assert_eq!(
        chunks[6].content,
        "1 Introduction\nThis document describes the brake controller software for the ECU."
    );
}

#[test]
fn test_fixture_cross_references() {
    let chunks = process_fixture();

    assert_eq!(
        chunks[6].metadata.toc_reference.as_deref(),
        Some("1 Introduction ........ 1")
    );
    assert_eq!(
        chunks[10].metadata.toc_reference.as_deref(),
        Some("GLOSSARY ........ 9")
    );
    assert_eq!(chunks[1].metadata.toc_reference, None);

    let purpose_terms: Vec<&str> = chunks[7]
        .metadata
        .resolved_glossary_terms
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(purpose_terms, vec!["ABS", "API"]);
    assert_eq!(chunks[10].metadata.resolved_glossary_terms.len(), 3);

    // parent first, then previous, then next
    assert_eq!(chunks[7].metadata.related_chunks, vec!["C2", "C7", "C9"]);
    assert_eq!(chunks[9].metadata.related_chunks, vec!["C4", "C9", "C11"]);

    assert_eq!(
        chunks[8].metadata.semantic_label,
        SemanticLabel::FunctionalRequirement
    );
    assert_eq!(chunks[9].metadata.semantic_label, SemanticLabel::Safety);
}

#[test]
fn test_contents_line_becomes_own_chunk() {
    let chunks = chunk_document("Contents\n1 Scope ..... 2\n1 Scope\nScope text", 1000, 0);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].content, "Contents");
    assert_eq!(chunks[1].content, "1 Scope ..... 2");
    assert_eq!(chunks[1].metadata.section_id.as_deref(), Some("1"));
    assert_eq!(chunks[2].content, "1 Scope\nScope text");
    assert_eq!(
        chunks[2].metadata.toc_reference.as_deref(),
        Some("1 Scope ..... 2")
    );
}

#[test]
fn test_deterministic_output() {
    let text = mixed_document();
    let first = chunks_to_json(&chunk_document(&text, 40, 12)).unwrap();
    let second = chunks_to_json(&chunk_document(&text, 40, 12)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ids_unique_and_increasing() {
    let chunks = chunk_document(&mixed_document(), 40, 12);
    assert!(chunks.len() > 10);

    let numbers: Vec<usize> = chunks.iter().map(|c| chunk_number(&c.chunk_id)).collect();
    let expected: Vec<usize> = (1..=chunks.len()).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_parents_precede_children() {
    for (window, overlap) in [(40, 0), (40, 12), (15, 8), (500, 0)] {
        let chunks = chunk_document(&mixed_document(), window, overlap);
        let mut seen = HashSet::new();

        for chunk in &chunks {
            if let Some(parent) = &chunk.metadata.parent_id {
                assert!(
                    seen.contains(parent.as_str()),
                    "{} has parent {} which is not earlier",
                    chunk.chunk_id,
                    parent
                );
            }
            seen.insert(chunk.chunk_id.as_str());
        }
    }
}

#[test]
fn test_every_line_is_covered() {
    let text = mixed_document();
    let chunks = chunk_document(&text, 40, 0);

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        assert!(
            chunks.iter().any(|c| c.content.lines().any(|l| l.trim() == line)),
            "line {line:?} was lost"
        );
    }
}

#[test]
fn test_budget_respected_at_each_decision() {
    let text = mixed_document();

    for window in [15, 40, 120] {
        let chunks = chunk_document(&text, window, 0);

        for (i, chunk) in chunks.iter().enumerate() {
            let lines: Vec<&str> = chunk.content.lines().collect();

            // every appended line passed the budget check
            if let Some((last, rest)) = lines.split_last() {
                if !rest.is_empty() {
                    let before = estimate_tokens(&rest.join("\n"));
                    assert!(
                        before + estimate_tokens(last) <= window,
                        "{} accepted a line past the budget of {window}",
                        chunk.chunk_id
                    );
                }
            }

            // a chunk closed without a header really was full
            let Some(next) = chunks.get(i + 1) else {
                continue;
            };
            let first_next = next.content.lines().next().unwrap_or_default();
            if detect_header(first_next).is_none() {
                assert!(
                    chunk.metadata.token_count + estimate_tokens(first_next) > window,
                    "{} was closed before reaching the budget of {window}",
                    chunk.chunk_id
                );
                assert_eq!(next.metadata.section_id, chunk.metadata.section_id);
            }
        }
    }
}

#[test]
fn test_adjacent_relations_are_symmetric() {
    let chunks = chunk_document(&mixed_document(), 40, 12);

    for (i, chunk) in chunks.iter().enumerate() {
        let related = &chunk.metadata.related_chunks;
        if i > 0 {
            assert!(related.contains(&chunks[i - 1].chunk_id));
        }
        if let Some(next) = chunks.get(i + 1) {
            assert!(related.contains(&next.chunk_id));
            assert!(next.metadata.related_chunks.contains(&chunk.chunk_id));
        }

        let unique: HashSet<&String> = related.iter().collect();
        assert_eq!(unique.len(), related.len());

        for id in related {
            let j = chunk_number(id) - 1;
            let adjacent = j + 1 == i || j == i + 1;
            assert!(adjacent || chunk.metadata.parent_id.as_ref() == Some(id));
        }
    }
}

#[test]
fn test_no_empty_chunks() {
    let text = "\n\n1 Scope\n\n\n2 Terms\n   \n\nBody";
    let chunks = chunk_document(text, 1000, 40);
    assert!(chunks.iter().all(|c| !c.content.trim().is_empty()));
    assert!(chunks
        .iter()
        .all(|c| c.metadata.char_count == c.content.chars().count()));
}

#[test]
fn test_keywords_are_capped() {
    let chunks = chunk_document(&mixed_document(), 4000, 0);
    assert!(chunks.iter().all(|c| c.metadata.keywords.len() <= 10));
}
