//! Script parser
//!
//! Splits pasted script text into an ordered list of typed sections. The
//! parser never fails: anything it cannot classify becomes a paragraph.
//!
//! # Algorithm
//!
//! 1. Split on blank-line boundaries, dropping paragraphs that trim to empty.
//! 2. Classify the first line of each paragraph (see [`classify_line`]).
//! 3. A classified single-line paragraph becomes one heading-like section.
//! 4. A classified multi-line paragraph becomes the heading line followed by
//!    a paragraph section with the remaining lines, if any remain after
//!    trimming.
//! 5. Everything else becomes one paragraph section.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_core::parser::{parse_script, SectionType};
//!
//! let sections = parse_script("INT. KITCHEN - DAY\nJohn enters.");
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].section_type, SectionType::Scene);
//! assert_eq!(sections[0].body, "INT. KITCHEN - DAY");
//! assert_eq!(sections[1].section_type, SectionType::Paragraph);
//! assert_eq!(sections[1].body, "John enters.");
//! ```

use regex::Regex;
use std::sync::LazyLock;

pub mod ast;
pub mod classify;

pub use ast::{
    number_sections, sort_sections, ParsedSection, ProjectId, Section, SectionDraft, SectionId,
    SectionType,
};
pub use classify::classify_line;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

/// Parse raw script text into ordered sections
///
/// Empty or whitespace-only input yields no sections.
#[must_use]
pub fn parse_script(text: &str) -> Vec<ParsedSection> {
    let mut sections = Vec::new();
    let mut paragraphs = 0_usize;

    for paragraph in PARAGRAPH_BREAK.split(text) {
        let trimmed = paragraph.trim();
        if trimmed.is_empty() {
            continue;
        }
        paragraphs += 1;

        let (first, rest) = match trimmed.split_once('\n') {
            Some((first, rest)) => (first.trim(), Some(rest)),
            None => (trimmed, None),
        };

        match (classify_line(first), rest) {
            (Some(section_type), None) => {
                sections.push(ParsedSection {
                    title: Some(first.to_string()),
                    body: trimmed.to_string(),
                    section_type,
                });
            }
            (Some(section_type), Some(rest)) => {
                sections.push(ParsedSection::heading(section_type, first));
                let rest = rest.trim();
                if !rest.is_empty() {
                    sections.push(ParsedSection::paragraph(rest));
                }
            }
            (None, _) => sections.push(ParsedSection::paragraph(trimmed)),
        }
    }

    tracing::debug!(paragraphs, sections = sections.len(), "Parsed script text");
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_script_has_no_sections() {
        assert!(parse_script("").is_empty());
        assert!(parse_script("  \n\n\t \n ").is_empty());
    }

    #[test]
    fn standalone_heading_keeps_title() {
        let sections = parse_script("ACT ONE");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Act);
        assert_eq!(sections[0].title.as_deref(), Some("ACT ONE"));
        assert_eq!(sections[0].body, "ACT ONE");
    }

    #[test]
    fn heading_with_body_splits_in_two() {
        let sections = parse_script("COLD OPEN\nA phone rings.\nNobody answers.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].section_type, SectionType::Heading);
        assert_eq!(sections[0].body, "COLD OPEN");
        assert_eq!(sections[1].section_type, SectionType::Paragraph);
        assert_eq!(sections[1].title, None);
        assert_eq!(sections[1].body, "A phone rings.\nNobody answers.");
    }

    #[test]
    fn trailing_whitespace_after_heading_is_not_a_paragraph() {
        let sections = parse_script("SCENE 4\n   ");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Scene);
    }

    #[test]
    fn multiple_blank_lines_separate_paragraphs() {
        let sections = parse_script("First line.\n\n\n   \nSecond line.\nStill second.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "First line.");
        assert_eq!(sections[1].body, "Second line.\nStill second.");
        assert!(sections.iter().all(|s| s.section_type == SectionType::Paragraph));
    }

    #[test]
    fn crlf_input_is_split_and_trimmed() {
        let sections = parse_script("ACT ONE\r\n\r\nShe waits.\r\n");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, "ACT ONE");
        assert_eq!(sections[1].body, "She waits.");
    }

    #[test]
    fn lowercase_first_line_is_paragraph() {
        let sections = parse_script("the quick brown fox\nJUMPS");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_type, SectionType::Paragraph);
        assert_eq!(sections[0].body, "the quick brown fox\nJUMPS");
    }
}
