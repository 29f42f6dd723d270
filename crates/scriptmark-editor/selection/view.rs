//! In-memory rendering target
//!
//! `RenderedView` holds the inline trees a renderer would build for each
//! section and resolves tree positions for [`map_selection`](super::map_selection).
//! Hosts with a real UI implement [`TextPositionResolver`] over their own
//! widgets instead.

use super::inline::{flat_offset, text_content, text_len, InlineNode, NodePoint};
use super::TextPositionResolver;
use scriptmark_core::annotation::RenderSpan;
use scriptmark_core::parser::{Section, SectionId};

/// One rendered section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub id: SectionId,
    /// Rendered content, text container included
    pub nodes: Vec<InlineNode>,
    /// Whether `nodes` sit in a selectable text container; headings render
    /// without one
    pub has_text_container: bool,
}

impl RenderedSection {
    /// Body section with selectable text
    pub fn paragraph(id: impl Into<SectionId>, nodes: Vec<InlineNode>) -> Self {
        Self {
            id: id.into(),
            nodes,
            has_text_container: true,
        }
    }

    /// Heading section without a text container
    pub fn heading(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: vec![InlineNode::text(title)],
            has_text_container: false,
        }
    }

    /// Build the rendered form of a section from its resolved spans
    ///
    /// Heading-like sections render their title (or body) as plain text
    /// and ignore `spans`.
    #[must_use]
    pub fn from_spans(section: &Section, spans: &[RenderSpan<'_>]) -> Self {
        if !section.has_selectable_text() {
            let title = section.title.as_deref().unwrap_or(&section.body);
            return Self::heading(section.id.clone(), title);
        }
        let nodes = spans
            .iter()
            .filter(|span| !span.is_empty())
            .map(InlineNode::from_span)
            .collect();
        Self::paragraph(section.id.clone(), nodes)
    }

    /// Plain text of the section
    #[must_use]
    pub fn text(&self) -> String {
        text_content(&self.nodes)
    }

    /// Text length in UTF-16 code units
    #[must_use]
    pub fn text_len(&self) -> usize {
        text_len(&self.nodes)
    }
}

/// A boundary point inside a [`RenderedView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPoint {
    /// Position inside a section's node tree
    InSection { section: usize, point: NodePoint },
    /// Position outside every section (page chrome, toolbar, margins)
    Outside,
}

impl ViewPoint {
    /// Point inside section `section`
    #[must_use]
    pub const fn new(section: usize, point: NodePoint) -> Self {
        Self::InSection { section, point }
    }

    /// Point inside a text node of section `section`
    #[must_use]
    pub const fn text(section: usize, path: Vec<usize>, offset: usize) -> Self {
        Self::InSection {
            section,
            point: NodePoint::new(path, offset),
        }
    }
}

/// Ordered list of rendered sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedView {
    sections: Vec<RenderedSection>,
}

impl RenderedView {
    /// Create an empty view
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View over already rendered sections, in display order
    #[must_use]
    pub const fn from_sections(sections: Vec<RenderedSection>) -> Self {
        Self { sections }
    }

    /// Append a rendered section
    pub fn push(&mut self, section: RenderedSection) {
        self.sections.push(section);
    }

    /// Rendered sections in display order
    #[must_use]
    pub fn sections(&self) -> &[RenderedSection] {
        &self.sections
    }

    /// Index of a section by id
    #[must_use]
    pub fn position(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    /// Point at a flat text offset of a section
    ///
    /// Picks the text node that contains `offset`, preferring the earlier
    /// node at a boundary. This is the inverse of
    /// [`flat_offset`](super::flat_offset) for hosts that want to place a
    /// selection programmatically.
    #[must_use]
    pub fn point_at(&self, section: usize, offset: usize) -> Option<ViewPoint> {
        let rendered = self.sections.get(section)?;
        let mut path = Vec::new();
        let point = locate(&rendered.nodes, offset, &mut path)?;
        Some(ViewPoint::new(section, point))
    }
}

fn locate(nodes: &[InlineNode], mut offset: usize, path: &mut Vec<usize>) -> Option<NodePoint> {
    for (index, node) in nodes.iter().enumerate() {
        let len = node.text_len();
        if offset <= len {
            path.push(index);
            match node {
                InlineNode::Text(_) => return Some(NodePoint::new(path.clone(), offset)),
                InlineNode::Element { children, .. } => {
                    if let Some(point) = locate(children, offset, path) {
                        return Some(point);
                    }
                    path.pop();
                }
            }
        }
        offset = offset.checked_sub(len)?;
    }
    (offset == 0).then(|| NodePoint::new(path.clone(), nodes.len()))
}

impl TextPositionResolver for RenderedView {
    type Point = ViewPoint;

    fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_id(&self, index: usize) -> Option<&str> {
        self.sections.get(index).map(|s| s.id.as_str())
    }

    fn section_of(&self, point: &ViewPoint) -> Option<usize> {
        match point {
            ViewPoint::InSection { section, .. } if *section < self.sections.len() => {
                Some(*section)
            }
            _ => None,
        }
    }

    fn text_len(&self, index: usize) -> Option<usize> {
        self.sections
            .get(index)
            .filter(|s| s.has_text_container)
            .map(RenderedSection::text_len)
    }

    fn offset_in(&self, index: usize, point: &ViewPoint) -> Option<usize> {
        let rendered = self.sections.get(index)?;
        match point {
            ViewPoint::InSection { section, point } if *section == index => {
                flat_offset(&rendered.nodes, point)
            }
            // Outside this section: clamp like a boundary before or after it
            ViewPoint::InSection { section, .. } if *section < index => Some(0),
            ViewPoint::InSection { .. } => Some(rendered.text_len()),
            ViewPoint::Outside => None,
        }
    }
}
