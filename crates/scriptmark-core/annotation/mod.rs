//! Highlight annotation engine
//!
//! Highlights are character ranges over a section body. They may overlap
//! freely and be owned by different collaborators; rendering needs them as
//! disjoint spans, which [`compute_render_spans`] produces.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_core::annotation::{compute_render_spans, span_color, CoverageCategory, Highlight};
//!
//! let text = "The crowd gathers outside the station.";
//! let highlights = vec![
//!     Highlight::new("a", "s1", 4, 17).with_category(CoverageCategory::Media),
//!     Highlight::new("b", "s1", 10, 37).with_category(CoverageCategory::Graphics),
//! ];
//!
//! let spans = compute_render_spans(text, &highlights);
//! let overlap = &spans[2];
//! assert_eq!(overlap.text, "gathers");
//! assert_eq!(overlap.highlight_ids, ["a", "b"]);
//! assert_eq!(span_color(&overlap.highlight_ids, &highlights), "var(--highlight-blue)");
//! ```

pub mod coverage;
pub mod highlight;
pub mod spans;

pub use coverage::{
    collaborator_color, to_line_color, CoverageCategory, CoveragePalette, COLLABORATOR_COLORS,
    TRANSPARENT,
};
pub use highlight::{GroupId, Highlight, HighlightId};
pub use spans::{compute_render_spans, span_color, span_line_color, RenderSpan};
