//! Highlight rows
//!
//! A highlight is a character range over one section's body, counted in
//! UTF-16 code units. Offsets are signed so stale or hand-edited rows can
//! be represented and clamped instead of rejected.

use super::coverage::{CoverageCategory, CoveragePalette};
use crate::parser::SectionId;
use crate::utils::{utf16_len, CoreError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque highlight identifier
pub type HighlightId = String;

/// Opaque identifier shared by the rows of one multi-section annotation
pub type GroupId = String;

/// A persisted highlight row
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Highlight {
    pub id: HighlightId,
    pub section_id: SectionId,
    pub start_offset: i64,
    pub end_offset: i64,
    /// Coverage category name; `None` on legacy rows
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    /// Explicit display color overriding the category color
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub note: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_by: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_id: Option<GroupId>,
    /// Persistence timestamp (RFC 3339); `None` until the row is saved
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_at: Option<String>,
}

impl Highlight {
    /// Create an unlabeled highlight over `[start, end)`
    #[must_use]
    pub fn new(
        id: impl Into<HighlightId>,
        section_id: impl Into<SectionId>,
        start_offset: i64,
        end_offset: i64,
    ) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            start_offset,
            end_offset,
            label: None,
            color: None,
            note: None,
            created_by: None,
            group_id: None,
            created_at: None,
        }
    }

    /// Set the coverage category label
    #[must_use]
    pub fn with_category(mut self, category: CoverageCategory) -> Self {
        self.label = Some(category.as_str().to_string());
        self
    }

    /// Set an explicit display color
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the note text
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Set the owner
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.created_by = Some(owner.into());
        self
    }

    /// Link the row to a group
    #[must_use]
    pub fn with_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Set the persistence timestamp
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Coverage category, defaulting to media for missing or unknown labels
    #[must_use]
    pub fn category(&self) -> CoverageCategory {
        CoverageCategory::from_label(self.label.as_deref())
    }

    /// Display color: the explicit color if set, else the category color
    #[must_use]
    pub fn css_color<'a>(&'a self, palette: &'a CoveragePalette) -> &'a str {
        match self.color.as_deref() {
            Some(color) if !color.is_empty() => palette.resolve(color),
            _ => palette.color(self.category()),
        }
    }

    /// Length of the range in UTF-16 units, zero when inverted
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end_offset.saturating_sub(self.start_offset).max(0).unsigned_abs()
    }

    /// Whether the range is empty or inverted
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end_offset <= self.start_offset
    }

    /// Check `0 <= start < end <= len(text)`
    ///
    /// Rendering never needs this; it is for callers that want to reject
    /// bad rows before persisting them.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidOffset`] when the range is out of bounds,
    /// empty or inverted.
    pub fn validate_against(&self, text: &str) -> Result<(), CoreError> {
        let length = utf16_len(text);
        let start = usize::try_from(self.start_offset).ok();
        let end = usize::try_from(self.end_offset).ok();
        match (start, end) {
            (Some(start), Some(end)) if start < end && end <= length => Ok(()),
            _ => Err(CoreError::invalid_offset(
                usize::try_from(self.start_offset).unwrap_or(0),
                usize::try_from(self.end_offset).unwrap_or(0),
                length,
            )),
        }
    }
}
