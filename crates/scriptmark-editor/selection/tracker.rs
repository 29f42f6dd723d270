//! Two-state selection tracking
//!
//! The tracker is either idle or holds the one most recent mapped
//! selection. Nothing is queued: every new selection event replaces the
//! previous state.

use super::{map_selection, SelectionDescriptor, TextPositionResolver};
use crate::core::{SectionRange, SelectionRect};

/// A mapped, non-empty selection
#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection {
    /// One range per touched section, in section order
    pub ranges: Vec<SectionRange>,
    /// Trimmed selected text
    pub selected_text: String,
    /// Bounding box for toolbar placement
    pub rect: Option<SelectionRect>,
}

/// Tracker state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    /// No active selection
    #[default]
    Idle,
    /// A non-collapsed selection
    Active(TextSelection),
}

/// Tracks the current text selection
///
/// # Example
///
/// ```rust
/// use scriptmark_editor::selection::{
///     InlineNode, RenderedSection, RenderedView, SelectionDescriptor, SelectionTracker, ViewPoint,
/// };
///
/// let view = RenderedView::from_sections(vec![RenderedSection::paragraph(
///     "s1",
///     vec![InlineNode::text("Hello world")],
/// )]);
/// let mut tracker = SelectionTracker::new();
///
/// let sel = SelectionDescriptor::new(
///     ViewPoint::text(0, vec![0], 0),
///     ViewPoint::text(0, vec![0], 5),
///     "Hello",
/// );
/// assert!(tracker.update(&view, &sel).is_some());
/// assert!(tracker.is_active());
///
/// let taken = tracker.complete().unwrap();
/// assert_eq!(taken.ranges[0].end_offset, 5);
/// assert!(!tracker.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    state: SelectionState,
}

impl SelectionTracker {
    /// Create an idle tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Whether a selection is active
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SelectionState::Active(_))
    }

    /// The active selection, if any
    #[must_use]
    pub const fn selection(&self) -> Option<&TextSelection> {
        match &self.state {
            SelectionState::Active(selection) => Some(selection),
            SelectionState::Idle => None,
        }
    }

    /// Handle a selection event
    ///
    /// Maps the selection and becomes active on success; a blank, collapsed
    /// or unresolvable selection makes the tracker idle.
    pub fn update<R>(
        &mut self,
        resolver: &R,
        selection: &SelectionDescriptor<R::Point>,
    ) -> Option<&TextSelection>
    where
        R: TextPositionResolver + ?Sized,
    {
        self.state = match map_selection(resolver, selection) {
            Some(ranges) => {
                tracing::trace!(ranges = ranges.len(), "Selection active");
                SelectionState::Active(TextSelection {
                    ranges,
                    selected_text: selection.text.trim().to_string(),
                    rect: selection.rect,
                })
            }
            None => SelectionState::Idle,
        };
        self.selection()
    }

    /// Handle a collapsed or empty selection event
    pub fn collapse(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Dismiss the selection explicitly
    pub fn dismiss(&mut self) {
        if self.is_active() {
            tracing::trace!("Selection dismissed");
        }
        self.state = SelectionState::Idle;
    }

    /// Take the selection for highlight creation, leaving the tracker idle
    pub fn complete(&mut self) -> Option<TextSelection> {
        match core::mem::take(&mut self.state) {
            SelectionState::Active(selection) => Some(selection),
            SelectionState::Idle => None,
        }
    }

    /// Toolbar anchor of the active selection
    #[must_use]
    pub fn toolbar_anchor(&self) -> Option<(f64, f64)> {
        self.selection()?.rect.map(|rect| rect.toolbar_anchor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{InlineNode, RenderedSection, RenderedView, ViewPoint};

    fn view() -> RenderedView {
        RenderedView::from_sections(vec![RenderedSection::paragraph(
            "s1",
            vec![InlineNode::text("A ferry crosses the river.")],
        )])
    }

    fn select(start: usize, end: usize, text: &str) -> SelectionDescriptor<ViewPoint> {
        SelectionDescriptor::new(
            ViewPoint::text(0, vec![0], start),
            ViewPoint::text(0, vec![0], end),
            text,
        )
    }

    #[test]
    fn idle_to_active_and_back() {
        let view = view();
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.state(), &SelectionState::Idle);

        let sel = select(2, 7, " ferry ").with_rect(SelectionRect::new(0.0, 10.0, 40.0, 12.0));
        let active = tracker.update(&view, &sel).unwrap();
        assert_eq!(active.selected_text, "ferry");
        assert_eq!(tracker.toolbar_anchor(), Some((20.0, 10.0)));

        tracker.dismiss();
        assert!(!tracker.is_active());
        assert_eq!(tracker.toolbar_anchor(), None);
    }

    #[test]
    fn new_selection_replaces_previous() {
        let view = view();
        let mut tracker = SelectionTracker::new();
        tracker.update(&view, &select(2, 7, "ferry"));
        tracker.update(&view, &select(20, 25, "river"));
        let ranges = &tracker.selection().unwrap().ranges;
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start_offset, 20);
    }

    #[test]
    fn collapsed_event_goes_idle() {
        let view = view();
        let mut tracker = SelectionTracker::new();
        tracker.update(&view, &select(2, 7, "ferry"));
        assert!(tracker.update(&view, &select(4, 4, "")).is_none());
        assert!(!tracker.is_active());

        tracker.update(&view, &select(2, 7, "ferry"));
        tracker.collapse();
        assert!(!tracker.is_active());
    }

    #[test]
    fn complete_takes_selection_once() {
        let view = view();
        let mut tracker = SelectionTracker::new();
        tracker.update(&view, &select(2, 7, "ferry"));
        assert!(tracker.complete().is_some());
        assert!(tracker.complete().is_none());
    }
}
