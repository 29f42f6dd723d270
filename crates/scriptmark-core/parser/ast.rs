//! Section types produced by the script parser
//!
//! `ParsedSection` is the parser's output, `SectionDraft` is the same data
//! numbered for bulk insert, and `Section` is the persisted row the rest of
//! the system reads back.

use crate::utils::CoreError;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque project identifier assigned by the persistence layer
pub type ProjectId = String;

/// Opaque section identifier assigned by the persistence layer
pub type SectionId = String;

/// Structural classification of a section
///
/// # Examples
///
/// ```rust
/// use scriptmark_core::parser::SectionType;
///
/// assert_eq!(SectionType::parse("scene"), Some(SectionType::Scene));
/// assert!(SectionType::Act.is_heading());
/// assert!(!SectionType::Paragraph.is_heading());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SectionType {
    /// `ACT <token>` line
    Act,
    /// `SCENE <token>`, `SC. <token>` or an `INT.`/`EXT.` slug line
    Scene,
    /// Short all-caps line
    Heading,
    /// Everything else
    Paragraph,
}

impl SectionType {
    /// Return the section type as its stored lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Act => "act",
            Self::Scene => "scene",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
        }
    }

    /// Parse a stored section type name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "act" => Some(Self::Act),
            "scene" => Some(Self::Scene),
            "heading" => Some(Self::Heading),
            "paragraph" => Some(Self::Paragraph),
            _ => None,
        }
    }

    /// Whether the section renders as a heading (no selectable body text)
    #[must_use]
    pub const fn is_heading(self) -> bool {
        !matches!(self, Self::Paragraph)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for SectionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            CoreError::validation(format!(
                "Invalid section type '{s}'. Must be one of: act, scene, heading, paragraph"
            ))
        })
    }
}

/// One section emitted by [`parse_script`](super::parse_script)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedSection {
    /// Trimmed heading line for act/scene/heading sections
    pub title: Option<String>,
    /// Section text
    pub body: String,
    /// Structural classification
    pub section_type: SectionType,
}

impl ParsedSection {
    /// Create a paragraph section
    #[must_use]
    pub fn paragraph(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            section_type: SectionType::Paragraph,
        }
    }

    /// Create a heading-like section whose title is its body
    #[must_use]
    pub fn heading(section_type: SectionType, line: &str) -> Self {
        Self {
            title: Some(line.to_string()),
            body: line.to_string(),
            section_type,
        }
    }
}

/// A parsed section numbered for bulk insert
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionDraft {
    pub project_id: ProjectId,
    pub title: Option<String>,
    pub body: String,
    pub section_type: SectionType,
    pub sort_order: i64,
}

/// A persisted section row
///
/// The body never changes after creation; replacing the script replaces
/// the whole section set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section {
    pub id: SectionId,
    pub project_id: ProjectId,
    pub title: Option<String>,
    pub body: String,
    pub section_type: SectionType,
    pub sort_order: i64,
}

impl Section {
    /// Attach a persisted id to a draft
    #[must_use]
    pub fn from_draft(id: impl Into<SectionId>, draft: SectionDraft) -> Self {
        Self {
            id: id.into(),
            project_id: draft.project_id,
            title: draft.title,
            body: draft.body,
            section_type: draft.section_type,
            sort_order: draft.sort_order,
        }
    }

    /// Whether this section has selectable body text
    #[must_use]
    pub const fn has_selectable_text(&self) -> bool {
        !self.section_type.is_heading()
    }
}

/// Assign `sort_order` as the emission index
///
/// # Example
///
/// ```rust
/// use scriptmark_core::parser::{number_sections, parse_script};
///
/// let drafts = number_sections("p1", parse_script("ACT ONE\n\nIt begins."));
/// assert_eq!(drafts[0].sort_order, 0);
/// assert_eq!(drafts[1].sort_order, 1);
/// ```
#[must_use]
pub fn number_sections(project_id: &str, sections: Vec<ParsedSection>) -> Vec<SectionDraft> {
    sections
        .into_iter()
        .zip(0_i64..)
        .map(|(section, sort_order)| SectionDraft {
            project_id: project_id.to_string(),
            title: section.title,
            body: section.body,
            section_type: section.section_type,
            sort_order,
        })
        .collect()
}

/// Sort sections into display order
///
/// Stable, so duplicate `sort_order` values keep their relative order.
pub fn sort_sections(sections: &mut [Section]) {
    sections.sort_by_key(|s| s.sort_order);
}
