//! # Scriptmark Core
//!
//! Text-range annotation engine for scripts: a parser that splits pasted
//! script text into typed sections, and a resolver that turns overlapping
//! highlight ranges into the disjoint spans a renderer draws.
//!
//! ## Features
//!
//! - **Heuristic section parsing**: acts, scenes, all-caps headings and
//!   paragraphs, never failing on malformed input
//! - **Overlap resolution**: a boundary sweep producing a gap-free partition
//!   of the text, each span tagged with every covering highlight in input
//!   order
//! - **UTF-16 offsets**: highlight offsets count UTF-16 code units, matching
//!   the native string indexing of browser hosts
//! - **Coverage palette**: closed category set with per-project color
//!   overrides read from the project settings JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use scriptmark_core::{compute_render_spans, parse_script, Highlight, SectionType};
//!
//! let sections = parse_script("ACT ONE\n\nINT. KITCHEN - DAY\nJohn enters.");
//! assert_eq!(sections.len(), 3);
//! assert_eq!(sections[0].section_type, SectionType::Act);
//!
//! let body = &sections[2].body;
//! let highlights = vec![Highlight::new("h1", "s3", 0, 4)];
//! let spans = compute_render_spans(body, &highlights);
//! assert_eq!(spans[0].text, "John");
//! assert_eq!(spans[1].text, " enters.");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod annotation;
pub mod parser;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod config;

pub mod utils;

pub use annotation::{
    compute_render_spans, span_color, span_line_color, CoverageCategory, CoveragePalette,
    GroupId, Highlight, HighlightId, RenderSpan,
};
pub use parser::{parse_script, ParsedSection, Section, SectionId, SectionType};
pub use utils::{CoreError, ErrorCategory};

#[cfg(feature = "serde")]
pub use config::{CoverageColors, ProjectSettings};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for core operations, using the crate's unified `CoreError`
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::parser::number_sections;

    /// Parse a script, then annotate one of its paragraphs end to end
    #[test]
    fn parse_then_resolve_spans() {
        let script = "ACT ONE\n\nINT. STATION - NIGHT\nA train pulls in. Doors open.\n\nCLOSING TITLES";
        let drafts = number_sections("p1", parse_script(script));
        let types: Vec<_> = drafts.iter().map(|d| d.section_type).collect();
        assert_eq!(
            types,
            [
                SectionType::Act,
                SectionType::Scene,
                SectionType::Paragraph,
                SectionType::Heading
            ]
        );
        assert!(drafts.windows(2).all(|w| w[0].sort_order < w[1].sort_order));

        let body = drafts[2].body.as_str();
        assert_eq!(body, "A train pulls in. Doors open.");

        let highlights = vec![
            Highlight::new("media", "s3", 2, 17).with_category(CoverageCategory::Media),
            Highlight::new("gfx", "s3", 8, 29).with_category(CoverageCategory::Graphics),
        ];
        let spans = compute_render_spans(body, &highlights);
        let joined: String = spans.iter().map(|s| s.text).collect();
        assert_eq!(joined, body);

        let stacked = spans
            .iter()
            .find(|s| s.highlight_ids.len() == 2)
            .expect("overlap should produce a stacked span");
        assert_eq!(stacked.text, "pulls in.");
        assert_eq!(span_color(&stacked.highlight_ids, &highlights), "var(--highlight-blue)");
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
