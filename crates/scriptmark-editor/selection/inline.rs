//! Inline rendering tree and flat text offsets
//!
//! A rendered section is a tree of text runs wrapped in any number of
//! highlight elements. Selection endpoints arrive as tree positions; the
//! functions here convert them to plain-text offsets that ignore how many
//! elements wrap a character.
//!
//! Positions follow the usual boundary-point convention: inside a text node
//! the offset counts UTF-16 code units, inside an element it counts child
//! nodes.

use scriptmark_core::annotation::{HighlightId, RenderSpan};
use scriptmark_core::utils::utf16_len;

/// One node of a rendered section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// A run of text
    Text(String),
    /// A wrapper element, optionally marking a highlight
    Element {
        highlight_id: Option<HighlightId>,
        children: Vec<InlineNode>,
    },
}

impl InlineNode {
    /// Text run
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Plain wrapper element
    #[must_use]
    pub const fn element(children: Vec<Self>) -> Self {
        Self::Element {
            highlight_id: None,
            children,
        }
    }

    /// Highlight mark around `children`
    pub fn mark(highlight_id: impl Into<HighlightId>, children: Vec<Self>) -> Self {
        Self::Element {
            highlight_id: Some(highlight_id.into()),
            children,
        }
    }

    /// Node for one resolved span: a mark keyed by the span's primary id,
    /// or a bare text run when nothing covers it
    #[must_use]
    pub fn from_span(span: &RenderSpan<'_>) -> Self {
        match span.primary_id() {
            Some(id) => Self::mark(id, vec![Self::text(span.text)]),
            None => Self::text(span.text),
        }
    }

    /// Length of the node's text content in UTF-16 code units
    #[must_use]
    pub fn text_len(&self) -> usize {
        match self {
            Self::Text(text) => utf16_len(text),
            Self::Element { children, .. } => children.iter().map(Self::text_len).sum(),
        }
    }

    /// Append the node's text content to `out`
    pub fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn children(&self) -> Option<&[Self]> {
        match self {
            Self::Text(_) => None,
            Self::Element { children, .. } => Some(children),
        }
    }
}

/// Text content of a node list
#[must_use]
pub fn text_content(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}

/// Combined UTF-16 length of a node list
#[must_use]
pub fn text_len(nodes: &[InlineNode]) -> usize {
    nodes.iter().map(InlineNode::text_len).sum()
}

/// A boundary point inside a node list
///
/// `path` walks child indices from the root list down to the container
/// node; an empty path means the root list itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodePoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl NodePoint {
    /// Create a new point
    #[must_use]
    pub const fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Point between root children, before child `index`
    #[must_use]
    pub const fn root(index: usize) -> Self {
        Self {
            path: Vec::new(),
            offset: index,
        }
    }
}

/// Flat text offset of a boundary point
///
/// Sums the text length of everything before the point in document order.
/// Returns `None` when the path leaves the tree or the offset exceeds its
/// container.
///
/// # Example
///
/// ```rust
/// use scriptmark_editor::selection::{flat_offset, InlineNode, NodePoint};
///
/// // "The " <mark>"cr" <mark>"ow"</mark></mark> "d"
/// let nodes = vec![
///     InlineNode::text("The "),
///     InlineNode::mark("a", vec![
///         InlineNode::text("cr"),
///         InlineNode::mark("b", vec![InlineNode::text("ow")]),
///     ]),
///     InlineNode::text("d"),
/// ];
///
/// // one unit into the innermost "ow"
/// assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![1, 1, 0], 1)), Some(7));
/// // before the trailing "d", expressed on the root list
/// assert_eq!(flat_offset(&nodes, &NodePoint::root(2)), Some(8));
/// ```
#[must_use]
pub fn flat_offset(nodes: &[InlineNode], point: &NodePoint) -> Option<usize> {
    let mut siblings = nodes;
    let mut before = 0;

    for (depth, &index) in point.path.iter().enumerate() {
        let node = siblings.get(index)?;
        before += text_len(&siblings[..index]);
        match node.children() {
            Some(children) => siblings = children,
            None => {
                // A text node must be the last path step
                if depth + 1 != point.path.len() || point.offset > node.text_len() {
                    return None;
                }
                return Some(before + point.offset);
            }
        }
    }

    let children = siblings.get(..point.offset)?;
    Some(before + text_len(children))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<InlineNode> {
        vec![
            InlineNode::text("ab"),
            InlineNode::mark(
                "h1",
                vec![
                    InlineNode::text("cd"),
                    InlineNode::mark("h2", vec![InlineNode::text("ef")]),
                ],
            ),
            InlineNode::element(vec![]),
            InlineNode::text("gh"),
        ]
    }

    #[test]
    fn text_content_flattens_nesting() {
        let nodes = sample();
        assert_eq!(text_content(&nodes), "abcdefgh");
        assert_eq!(text_len(&nodes), 8);
    }

    #[test]
    fn offsets_in_text_nodes() {
        let nodes = sample();
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![0], 1)), Some(1));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![1, 0], 2)), Some(4));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![1, 1, 0], 0)), Some(4));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![3], 2)), Some(8));
    }

    #[test]
    fn offsets_in_elements_count_children() {
        let nodes = sample();
        assert_eq!(flat_offset(&nodes, &NodePoint::root(0)), Some(0));
        assert_eq!(flat_offset(&nodes, &NodePoint::root(2)), Some(6));
        assert_eq!(flat_offset(&nodes, &NodePoint::root(4)), Some(8));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![1], 1)), Some(4));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![2], 0)), Some(6));
    }

    #[test]
    fn invalid_points_resolve_to_none() {
        let nodes = sample();
        assert_eq!(flat_offset(&nodes, &NodePoint::root(5)), None);
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![9], 0)), None);
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![0], 3)), None);
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![0, 0], 0)), None);
    }

    #[test]
    fn utf16_units_inside_text() {
        let nodes = vec![InlineNode::text("é🎬"), InlineNode::text("x")];
        assert_eq!(text_len(&nodes), 4);
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![1], 1)), Some(4));
        assert_eq!(flat_offset(&nodes, &NodePoint::new(vec![0], 3)), Some(3));
    }
}
