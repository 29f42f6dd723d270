//! Section-relative ranges and selection geometry
//!
//! A `SectionRange` is what selection mapping produces and what highlight
//! creation consumes: a half-open UTF-16 range inside one section's text.

use crate::core::errors::{EditorError, Result};
use core::fmt;
use scriptmark_core::annotation::{CoverageCategory, Highlight};
use scriptmark_core::parser::SectionId;
use scriptmark_core::utils::utf16_len;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range inside one section's text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SectionRange {
    /// Section the range belongs to
    pub section_id: SectionId,
    /// Start offset in UTF-16 code units (inclusive)
    pub start_offset: usize,
    /// End offset in UTF-16 code units (exclusive)
    pub end_offset: usize,
}

impl SectionRange {
    /// Create a new range
    #[must_use]
    pub fn new(section_id: impl Into<SectionId>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            section_id: section_id.into(),
            start_offset,
            end_offset,
        }
    }

    /// Length in UTF-16 code units
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    /// Check if the range is empty or inverted
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end_offset <= self.start_offset
    }

    /// Check if an offset falls inside the range
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start_offset && offset < self.end_offset
    }

    /// Check the range against the section text it refers to
    ///
    /// # Errors
    /// Returns [`EditorError::InvalidRange`] unless
    /// `start < end <= utf16_len(text)`.
    pub fn validate(&self, text: &str) -> Result<()> {
        let length = utf16_len(text);
        if self.start_offset < self.end_offset && self.end_offset <= length {
            return Ok(());
        }
        Err(EditorError::InvalidRange {
            section_id: self.section_id.clone(),
            start: self.start_offset,
            end: self.end_offset,
            length,
        })
    }

    /// Build a highlight row covering this range
    #[must_use]
    pub fn to_highlight(&self, id: impl Into<String>, category: CoverageCategory) -> Highlight {
        Highlight::new(
            id,
            self.section_id.clone(),
            i64::try_from(self.start_offset).unwrap_or(i64::MAX),
            i64::try_from(self.end_offset).unwrap_or(i64::MAX),
        )
        .with_category(category)
    }
}

impl fmt::Display for SectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}..{})",
            self.section_id, self.start_offset, self.end_offset
        )
    }
}

/// Bounding rectangle of a selection, in the host's viewport units
///
/// Only used to place the floating toolbar; the mapping algorithm never
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SelectionRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check if the rectangle has no area
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle containing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        Self {
            left,
            top,
            width: self.right().max(other.right()) - left,
            height: self.bottom().max(other.bottom()) - top,
        }
    }

    /// Toolbar anchor: horizontal center of the top edge
    #[must_use]
    pub fn toolbar_anchor(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top)
    }
}
