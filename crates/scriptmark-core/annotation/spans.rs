//! Overlapping highlight resolution
//!
//! Converts a section's possibly-overlapping highlights into the ordered,
//! disjoint spans a renderer draws. Every distinct clamped highlight edge
//! becomes a boundary; each gap between two consecutive boundaries is one
//! span, tagged with every highlight that fully contains it.

use super::coverage::{to_line_color, CoverageCategory, CoveragePalette, TRANSPARENT};
use super::highlight::Highlight;
use crate::utils::Utf16Index;
use std::borrow::Cow;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One disjoint slice of a section's text
///
/// Offsets are UTF-16 code units. `highlight_ids` keeps the input order of
/// the highlights, so the first id is the span's primary highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RenderSpan<'a> {
    pub text: &'a str,
    pub highlight_ids: Vec<&'a str>,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl<'a> RenderSpan<'a> {
    /// Id a renderer attaches click handlers to
    #[must_use]
    pub fn primary_id(&self) -> Option<&'a str> {
        self.highlight_ids.first().copied()
    }

    /// Whether any highlight covers the span
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        !self.highlight_ids.is_empty()
    }

    /// Width in UTF-16 code units
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Whether the span has zero width
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end_offset == self.start_offset
    }
}

/// Split `text` into disjoint spans by highlight coverage
///
/// Never fails: offsets are clamped into `[0, len]` and snapped to
/// character boundaries, and inverted or empty ranges cover nothing. The
/// returned spans concatenate back to `text` exactly.
///
/// With no highlights the whole text is one unhighlighted span, even when
/// the text is empty.
///
/// # Example
///
/// ```rust
/// use scriptmark_core::annotation::{compute_render_spans, Highlight};
///
/// let highlights = vec![Highlight::new("h1", "s1", 0, 5)];
/// let spans = compute_render_spans("Hello world", &highlights);
///
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[0].text, "Hello");
/// assert_eq!(spans[0].highlight_ids, ["h1"]);
/// assert_eq!(spans[1].text, " world");
/// assert!(spans[1].highlight_ids.is_empty());
/// ```
#[must_use]
pub fn compute_render_spans<'a>(text: &'a str, highlights: &'a [Highlight]) -> Vec<RenderSpan<'a>> {
    let index = Utf16Index::new(text);
    let len = index.len_utf16();

    if highlights.is_empty() {
        return vec![RenderSpan {
            text,
            highlight_ids: Vec::new(),
            start_offset: 0,
            end_offset: len,
        }];
    }

    let ranges: Vec<(usize, usize)> = highlights
        .iter()
        .map(|h| {
            let range = (index.clamp(h.start_offset), index.clamp(h.end_offset));
            if i64::try_from(range.0).ok() != Some(h.start_offset)
                || i64::try_from(range.1).ok() != Some(h.end_offset)
            {
                tracing::debug!(
                    highlight = %h.id,
                    start = h.start_offset,
                    end = h.end_offset,
                    length = len,
                    "Clamped highlight offsets"
                );
            }
            range
        })
        .collect();

    let mut boundaries = BTreeSet::new();
    boundaries.insert(0);
    boundaries.insert(len);
    for &(start, end) in &ranges {
        boundaries.insert(start);
        boundaries.insert(end);
    }

    let boundaries: Vec<usize> = boundaries.into_iter().collect();
    let spans: Vec<RenderSpan<'a>> = boundaries
        .windows(2)
        .filter(|pair| pair[0] < pair[1])
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let highlight_ids = highlights
                .iter()
                .zip(&ranges)
                .filter(|(_, range)| range.0 <= a && range.1 >= b)
                .map(|(h, _)| h.id.as_str())
                .collect();
            RenderSpan {
                text: index.slice(a, b),
                highlight_ids,
                start_offset: a,
                end_offset: b,
            }
        })
        .collect();

    tracing::trace!(
        highlights = highlights.len(),
        spans = spans.len(),
        "Computed render spans"
    );
    spans
}

/// Display color of a span with the built-in palette
///
/// The first listed highlight decides: its explicit color if set, else
/// its category color. Overlaps are not blended. An empty list is
/// `"transparent"`; an id missing from `highlights` gets the media color.
#[must_use]
pub fn span_color<'a>(highlight_ids: &[&str], highlights: &'a [Highlight]) -> &'a str {
    let Some(first) = highlight_ids.first() else {
        return TRANSPARENT;
    };
    highlights
        .iter()
        .find(|h| h.id == *first)
        .map_or(CoverageCategory::Media.default_color(), |h| {
            match h.color.as_deref() {
                Some(color) if !color.is_empty() => color,
                _ => h.category().default_color(),
            }
        })
}

/// Line-accent color of a span with the built-in palette
#[must_use]
pub fn span_line_color<'a>(highlight_ids: &[&str], highlights: &'a [Highlight]) -> Cow<'a, str> {
    to_line_color(span_color(highlight_ids, highlights))
}

impl CoveragePalette {
    /// Display color of a span with this palette's overrides applied
    #[must_use]
    pub fn span_color<'a>(&'a self, highlight_ids: &[&str], highlights: &'a [Highlight]) -> &'a str {
        let Some(first) = highlight_ids.first() else {
            return TRANSPARENT;
        };
        highlights
            .iter()
            .find(|h| h.id == *first)
            .map_or_else(
                || self.color(CoverageCategory::Media),
                |h| h.css_color(self),
            )
    }

    /// Line-accent color of a span with this palette's overrides applied
    #[must_use]
    pub fn span_line_color<'a>(
        &'a self,
        highlight_ids: &[&str],
        highlights: &'a [Highlight],
    ) -> Cow<'a, str> {
        to_line_color(self.span_color(highlight_ids, highlights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(spans: &[RenderSpan<'a>]) -> Vec<&'a str> {
        spans.iter().map(|s| s.text).collect()
    }

    #[test]
    fn no_highlights_is_one_span() {
        let spans = compute_render_spans("plain", &[]);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "plain");
        assert!(!spans[0].is_highlighted());
        assert_eq!(spans[0].primary_id(), None);
    }

    #[test]
    fn empty_text_without_highlights_keeps_one_empty_span() {
        let spans = compute_render_spans("", &[]);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].is_empty());
    }

    #[test]
    fn empty_text_with_highlights_has_no_spans() {
        let highlights = vec![Highlight::new("h", "s", 0, 4)];
        assert!(compute_render_spans("", &highlights).is_empty());
    }

    #[test]
    fn middle_highlight_gives_three_spans() {
        let highlights = vec![Highlight::new("h", "s", 2, 5)];
        let spans = compute_render_spans("abcdefg", &highlights);
        assert_eq!(texts(&spans), ["ab", "cde", "fg"]);
        assert_eq!(spans[1].highlight_ids, ["h"]);
        assert_eq!((spans[1].start_offset, spans[1].end_offset), (2, 5));
    }

    #[test]
    fn overlap_lists_ids_in_input_order() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let highlights = vec![
            Highlight::new("b", "s", 10, 24),
            Highlight::new("a", "s", 4, 15),
        ];
        let spans = compute_render_spans(text, &highlights);
        let overlap = spans.iter().find(|s| s.start_offset == 10).unwrap();
        assert_eq!(overlap.end_offset, 15);
        assert_eq!(overlap.highlight_ids, ["b", "a"]);
    }

    #[test]
    fn out_of_range_offsets_are_clamped() {
        let highlights = vec![Highlight::new("h", "s", -3, 99)];
        let spans = compute_render_spans("abc", &highlights);
        assert_eq!(texts(&spans), ["abc"]);
        assert_eq!(spans[0].highlight_ids, ["h"]);
    }

    #[test]
    fn inverted_range_splits_but_covers_nothing() {
        let highlights = vec![Highlight::new("h", "s", 4, 1)];
        let spans = compute_render_spans("abcdef", &highlights);
        assert_eq!(texts(&spans), ["a", "bcd", "ef"]);
        assert!(spans.iter().all(|s| !s.is_highlighted()));
    }

    #[test]
    fn zero_width_range_covers_nothing() {
        let highlights = vec![Highlight::new("h", "s", 3, 3)];
        let spans = compute_render_spans("abcdef", &highlights);
        assert_eq!(texts(&spans), ["abc", "def"]);
        assert!(spans.iter().all(|s| !s.is_highlighted()));
    }

    #[test]
    fn utf16_offsets_slice_on_char_boundaries() {
        // "🎬" is two UTF-16 units
        let text = "🎬 Take two";
        let highlights = vec![Highlight::new("h", "s", 0, 2)];
        let spans = compute_render_spans(text, &highlights);
        assert_eq!(texts(&spans), ["🎬", " Take two"]);
        assert_eq!(spans[1].start_offset, 2);
    }

    #[test]
    fn span_color_takes_first_highlight() {
        let highlights = vec![
            Highlight::new("a", "s", 0, 4).with_category(CoverageCategory::Graphics),
            Highlight::new("b", "s", 0, 4).with_color("#abcdef"),
        ];
        assert_eq!(span_color(&["a", "b"], &highlights), "var(--highlight-green)");
        assert_eq!(span_color(&["b", "a"], &highlights), "#abcdef");
        assert_eq!(span_color(&[], &highlights), "transparent");
        assert_eq!(span_color(&["zzz"], &highlights), "var(--highlight-blue)");
        assert_eq!(
            span_line_color(&["a"], &highlights),
            "var(--highlight-green-line)"
        );
    }

    #[test]
    fn palette_span_color_applies_overrides() {
        let palette = CoveragePalette::new().with_override(CoverageCategory::Media, "#111111");
        let highlights = vec![Highlight::new("a", "s", 0, 4)];
        assert_eq!(palette.span_color(&["a"], &highlights), "#111111");
        assert_eq!(palette.span_color(&["missing"], &highlights), "#111111");
        assert_eq!(palette.span_color(&[], &highlights), "transparent");
        assert_eq!(palette.span_line_color(&["a"], &highlights), "#111111");
    }
}
