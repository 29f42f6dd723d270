//! Selection mapping
//!
//! Converts a UI text selection, which may span several rendered sections,
//! back into section-relative UTF-16 ranges. The platform-specific part
//! (finding which section a boundary point lies in and how far into the
//! section's text it is) sits behind [`TextPositionResolver`]; the
//! multi-section rules live in [`map_selection`] and hold for every
//! rendering target.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_editor::selection::{
//!     map_selection, InlineNode, RenderedSection, RenderedView, SelectionDescriptor, ViewPoint,
//! };
//!
//! let view = RenderedView::from_sections(vec![
//!     RenderedSection::paragraph("s1", vec![InlineNode::text("John enters.")]),
//!     RenderedSection::heading("s2", "SCENE 2"),
//!     RenderedSection::paragraph("s3", vec![InlineNode::text("Rain.")]),
//! ]);
//!
//! let selection = SelectionDescriptor::new(
//!     ViewPoint::text(0, vec![0], 5),
//!     ViewPoint::text(2, vec![0], 4),
//!     "enters.\nSCENE 2\nRain",
//! );
//! let ranges = map_selection(&view, &selection).unwrap();
//!
//! assert_eq!(ranges.len(), 2);
//! assert_eq!((ranges[0].start_offset, ranges[0].end_offset), (5, 12));
//! assert_eq!((ranges[1].start_offset, ranges[1].end_offset), (0, 4));
//! ```

pub mod inline;
pub mod tracker;
pub mod view;

pub use inline::{flat_offset, text_content, text_len, InlineNode, NodePoint};
pub use tracker::{SelectionState, SelectionTracker, TextSelection};
pub use view::{RenderedSection, RenderedView, ViewPoint};

use crate::core::{SectionRange, SelectionRect};

/// Platform boundary-point resolution
///
/// One implementation per rendering target (DOM, terminal, native
/// widgets). Sections are addressed by their display index.
pub trait TextPositionResolver {
    /// A selection boundary as the platform reports it
    type Point;

    /// Number of rendered sections
    fn section_count(&self) -> usize;

    /// Id of the section at `index`
    fn section_id(&self, index: usize) -> Option<&str>;

    /// Index of the section containing `point`
    fn section_of(&self, point: &Self::Point) -> Option<usize>;

    /// Selectable text length of the section at `index`
    ///
    /// `None` for sections rendered without a text container, such as
    /// headings.
    fn text_len(&self, index: usize) -> Option<usize>;

    /// Flat UTF-16 offset of `point` within the section at `index`
    ///
    /// Counts every character before the point regardless of the inline
    /// markup wrapping it.
    fn offset_in(&self, index: usize, point: &Self::Point) -> Option<usize>;
}

/// A raw selection as reported by the host
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionDescriptor<P> {
    /// Boundary where the selection starts in document order
    pub start: P,
    /// Boundary where the selection ends in document order
    pub end: P,
    /// Selected text as the host serializes it
    pub text: String,
    /// Bounding box of the selection, if the host measured it
    pub rect: Option<SelectionRect>,
}

impl<P> SelectionDescriptor<P> {
    /// Create a descriptor without geometry
    pub fn new(start: P, end: P, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            rect: None,
        }
    }

    /// Attach the selection's bounding box
    #[must_use]
    pub fn with_rect(mut self, rect: SelectionRect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Whether the selected text trims to nothing
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Map a selection to one range per touched section
///
/// Returns `None` ("no selection") when the text is blank, an endpoint lies
/// outside every section, or no section ends up with a non-empty range.
///
/// - Within one section the range is `[min, max)` of the two offsets.
/// - Across sections the first gets `[start, len)`, the last `[0, end)`
///   and every section between is covered whole. Sections without
///   selectable text, or with empty text, are skipped.
#[must_use]
pub fn map_selection<R>(resolver: &R, selection: &SelectionDescriptor<R::Point>) -> Option<Vec<SectionRange>>
where
    R: TextPositionResolver + ?Sized,
{
    if selection.is_blank() {
        tracing::debug!("No selection: selected text is blank");
        return None;
    }

    let (Some(first), Some(last)) = (
        resolver.section_of(&selection.start),
        resolver.section_of(&selection.end),
    ) else {
        tracing::debug!("No selection: boundary outside any section");
        return None;
    };
    let count = resolver.section_count();
    if first >= count || last >= count {
        tracing::debug!(first, last, count, "No selection: section index out of range");
        return None;
    }

    if first == last {
        return map_single(resolver, first, selection);
    }

    let (first, last, start, end) = if first < last {
        (first, last, &selection.start, &selection.end)
    } else {
        (last, first, &selection.end, &selection.start)
    };

    let mut ranges = Vec::new();
    for index in first..=last {
        let Some(section_id) = resolver.section_id(index) else {
            continue;
        };
        let Some(len) = resolver.text_len(index).filter(|&len| len > 0) else {
            continue;
        };

        let range = if index == first {
            resolver
                .offset_in(index, start)
                .filter(|&offset| offset < len)
                .map(|offset| (offset, len))
        } else if index == last {
            resolver
                .offset_in(index, end)
                .filter(|&offset| offset > 0)
                .map(|offset| (0, offset.min(len)))
        } else {
            Some((0, len))
        };

        if let Some((start_offset, end_offset)) = range {
            ranges.push(SectionRange::new(section_id, start_offset, end_offset));
        }
    }

    if ranges.is_empty() {
        tracing::debug!(first, last, "No selection: no section has selected text");
        return None;
    }
    Some(ranges)
}

fn map_single<R>(
    resolver: &R,
    index: usize,
    selection: &SelectionDescriptor<R::Point>,
) -> Option<Vec<SectionRange>>
where
    R: TextPositionResolver + ?Sized,
{
    let section_id = resolver.section_id(index)?;
    let (Some(a), Some(b)) = (
        resolver.offset_in(index, &selection.start),
        resolver.offset_in(index, &selection.end),
    ) else {
        tracing::debug!(section = section_id, "No selection: offsets unresolvable");
        return None;
    };
    if a == b {
        tracing::debug!(section = section_id, offset = a, "No selection: collapsed range");
        return None;
    }
    Some(vec![SectionRange::new(section_id, a.min(b), a.max(b))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view() -> RenderedView {
        RenderedView::from_sections(vec![
            RenderedSection::paragraph(
                "p1",
                vec![
                    InlineNode::text("The "),
                    InlineNode::mark("h1", vec![InlineNode::text("crowd")]),
                    InlineNode::text(" gathers."),
                ],
            ),
            RenderedSection::heading("h", "SCENE 2"),
            RenderedSection::paragraph("p2", vec![InlineNode::text("Middle text.")]),
            RenderedSection::paragraph("empty", vec![]),
            RenderedSection::paragraph("p3", vec![InlineNode::text("Last line.")]),
        ])
    }

    fn ranges(result: Option<Vec<SectionRange>>) -> Vec<(String, usize, usize)> {
        result
            .unwrap_or_default()
            .into_iter()
            .map(|r| (r.section_id, r.start_offset, r.end_offset))
            .collect()
    }

    #[test]
    fn single_section_counts_through_marks() {
        let sel = SelectionDescriptor::new(
            ViewPoint::text(0, vec![1, 0], 2),
            ViewPoint::text(0, vec![2], 4),
            "owd gat",
        );
        assert_eq!(ranges(map_selection(&view(), &sel)), vec![("p1".to_string(), 6, 13)]);
    }

    #[test]
    fn single_section_backwards_is_normalized() {
        let sel = SelectionDescriptor::new(
            ViewPoint::text(0, vec![2], 4),
            ViewPoint::text(0, vec![0], 1),
            "he crowd gat",
        );
        assert_eq!(ranges(map_selection(&view(), &sel)), vec![("p1".to_string(), 1, 13)]);
    }

    #[test]
    fn collapsed_and_blank_are_no_selection() {
        let collapsed = SelectionDescriptor::new(
            ViewPoint::text(0, vec![0], 2),
            ViewPoint::text(0, vec![0], 2),
            "x",
        );
        assert_eq!(map_selection(&view(), &collapsed), None);

        let blank = SelectionDescriptor::new(
            ViewPoint::text(0, vec![0], 0),
            ViewPoint::text(0, vec![0], 3),
            " \n ",
        );
        assert_eq!(map_selection(&view(), &blank), None);
    }

    #[test]
    fn outside_boundary_is_no_selection() {
        let sel = SelectionDescriptor::new(ViewPoint::Outside, ViewPoint::text(0, vec![0], 3), "The");
        assert_eq!(map_selection(&view(), &sel), None);
    }

    #[test]
    fn multi_section_skips_headings_and_empty_text() {
        let sel = SelectionDescriptor::new(
            ViewPoint::text(0, vec![2], 1),
            ViewPoint::text(4, vec![0], 4),
            "gathers.\nSCENE 2\nMiddle text.\nLast",
        );
        assert_eq!(
            ranges(map_selection(&view(), &sel)),
            vec![
                ("p1".to_string(), 10, 18),
                ("p2".to_string(), 0, 12),
                ("p3".to_string(), 0, 4),
            ]
        );
    }

    #[test]
    fn multi_section_drops_empty_edges() {
        // starts at the very end of p1 and ends at the very start of p3
        let sel = SelectionDescriptor::new(
            ViewPoint::text(0, vec![2], 9),
            ViewPoint::text(4, vec![0], 0),
            "SCENE 2\nMiddle text.",
        );
        assert_eq!(ranges(map_selection(&view(), &sel)), vec![("p2".to_string(), 0, 12)]);
    }

    #[test]
    fn multi_section_with_nothing_selectable_is_none() {
        let sel = SelectionDescriptor::new(
            ViewPoint::text(0, vec![2], 9),
            ViewPoint::text(1, vec![0], 5),
            "SCENE",
        );
        assert_eq!(map_selection(&view(), &sel), None);
    }

    #[test]
    fn single_heading_selection_uses_heading_text() {
        let sel = SelectionDescriptor::new(
            ViewPoint::text(1, vec![0], 0),
            ViewPoint::text(1, vec![0], 5),
            "SCENE",
        );
        assert_eq!(ranges(map_selection(&view(), &sel)), vec![("h".to_string(), 0, 5)]);
    }
}
