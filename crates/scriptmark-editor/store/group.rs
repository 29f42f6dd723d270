//! Logical annotations
//!
//! One annotation may span several sections. It is stored as one highlight
//! row per section range, all carrying the same `group_id`; the group owns
//! those rows so lookups, selection and deletion treat them as one unit.

use crate::core::{EditorError, Result, SectionRange};
use scriptmark_core::annotation::{CoverageCategory, GroupId, Highlight, HighlightId};
use scriptmark_core::CoreError;
use std::cmp::Ordering;

/// Lookup key of an annotation
///
/// Shared group ids and lone row ids live in separate key spaces, so a row
/// whose `group_id` happens to equal an ungrouped row's id never joins it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum GroupKey {
    Shared(GroupId),
    Single(HighlightId),
}

impl GroupKey {
    pub(crate) fn of(row: &Highlight) -> Self {
        match &row.group_id {
            Some(group_id) => Self::Shared(group_id.clone()),
            None => Self::Single(row.id.clone()),
        }
    }
}

/// Saved rows by timestamp, unsaved rows last
fn creation_order(a: &Highlight, b: &Highlight) -> Ordering {
    match (&a.created_at, &b.created_at) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A logical annotation and its per-section rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationGroup {
    id: GroupId,
    /// Whether the rows carry `id` as their `group_id`
    grouped: bool,
    members: Vec<Highlight>,
    /// Optimistic creation token while the rows are provisional
    pending: Option<String>,
}

impl AnnotationGroup {
    /// Group holding one row, keyed by its `group_id` or else its own id
    #[must_use]
    pub fn single(highlight: Highlight) -> Self {
        match highlight.group_id.clone() {
            Some(group_id) => Self {
                id: group_id,
                grouped: true,
                members: vec![highlight],
                pending: None,
            },
            None => Self {
                id: highlight.id.clone(),
                grouped: false,
                members: vec![highlight],
                pending: None,
            },
        }
    }

    /// Group from persisted rows
    ///
    /// A lone row may be ungrouped; several rows must all carry the same
    /// `group_id`. The earliest created row becomes the primary.
    ///
    /// # Errors
    /// Returns a validation error for an empty row list or rows that do
    /// not share a group id.
    pub fn from_rows(mut rows: Vec<Highlight>) -> Result<Self> {
        if rows.len() == 1 {
            if let Some(row) = rows.pop() {
                return Ok(Self::single(row));
            }
        }
        let Some(first) = rows.first() else {
            return Err(CoreError::validation("annotation has no highlight rows").into());
        };

        let Some(group_id) = first.group_id.clone() else {
            return Err(CoreError::validation(format!(
                "highlight '{}' is one of {} rows but has no group id",
                first.id,
                rows.len()
            ))
            .into());
        };
        if let Some(stray) = rows.iter().find(|row| row.group_id.as_ref() != Some(&group_id)) {
            return Err(CoreError::validation(format!(
                "highlight '{}' does not belong to group '{group_id}'",
                stray.id
            ))
            .into());
        }

        rows.sort_by(creation_order);
        Ok(Self {
            id: group_id,
            grouped: true,
            members: rows,
            pending: None,
        })
    }

    /// Provisional group for an optimistic create
    pub(crate) fn pending(token: &str, ranges: &[SectionRange], category: CoverageCategory, owner: Option<&str>) -> Self {
        let grouped = ranges.len() > 1;
        let members: Vec<Highlight> = ranges
            .iter()
            .enumerate()
            .map(|(index, range)| {
                let mut row = range.to_highlight(format!("{token}-{index}"), category);
                if grouped {
                    row.group_id = Some(token.to_string());
                }
                row.created_by = owner.map(str::to_string);
                row
            })
            .collect();
        let id = if grouped {
            token.to_string()
        } else {
            format!("{token}-0")
        };
        Self {
            id,
            grouped,
            members,
            pending: Some(token.to_string()),
        }
    }

    /// Group id; the row id for an ungrouped annotation
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn key(&self) -> GroupKey {
        if self.grouped {
            GroupKey::Shared(self.id.clone())
        } else {
            GroupKey::Single(self.id.clone())
        }
    }

    pub(crate) fn has_key(&self, key: &GroupKey) -> bool {
        match key {
            GroupKey::Shared(id) => self.grouped && self.id == *id,
            GroupKey::Single(id) => !self.grouped && self.id == *id,
        }
    }

    /// The earliest created row, used for selection and category
    ///
    /// Rows are ordered by `created_at`; unsaved rows follow saved ones in
    /// insertion order.
    #[must_use]
    pub fn primary(&self) -> &Highlight {
        // Groups are never constructed empty and the store drops emptied ones
        &self.members[0]
    }

    /// Rows in creation order, primary first
    #[must_use]
    pub fn members(&self) -> &[Highlight] {
        &self.members
    }

    /// Row ids in creation order
    #[must_use]
    pub fn highlight_ids(&self) -> Vec<HighlightId> {
        self.members.iter().map(|h| h.id.clone()).collect()
    }

    /// Check if a row belongs to this group
    #[must_use]
    pub fn contains(&self, highlight_id: &str) -> bool {
        self.members.iter().any(|h| h.id == highlight_id)
    }

    /// Category of the primary row
    #[must_use]
    pub fn category(&self) -> CoverageCategory {
        self.primary().category()
    }

    /// Whether the rows share a `group_id`
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.grouped
    }

    /// Whether this group is an unconfirmed optimistic create
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Optimistic creation token, if pending
    #[must_use]
    pub fn pending_token(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Distinct sections touched, in row order
    #[must_use]
    pub fn section_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.members.len());
        for row in &self.members {
            if !ids.contains(&row.section_id.as_str()) {
                ids.push(&row.section_id);
            }
        }
        ids
    }

    /// Per-section ranges, clamped at zero for legacy negative offsets
    pub fn ranges(&self) -> impl Iterator<Item = SectionRange> + '_ {
        self.members.iter().map(|h| {
            SectionRange::new(
                h.section_id.clone(),
                usize::try_from(h.start_offset).unwrap_or(0),
                usize::try_from(h.end_offset).unwrap_or(0),
            )
        })
    }

    pub(crate) fn get_mut(&mut self, highlight_id: &str) -> Option<&mut Highlight> {
        self.members.iter_mut().find(|h| h.id == highlight_id)
    }

    /// Add or replace a row, keeping creation order
    pub(crate) fn upsert(&mut self, highlight: Highlight) {
        match self.members.iter_mut().find(|h| h.id == highlight.id) {
            Some(existing) => *existing = highlight,
            None => self.members.push(highlight),
        }
        self.members.sort_by(creation_order);
    }

    /// Remove rows matching `predicate`, returning them
    pub(crate) fn take_members(&mut self, predicate: impl FnMut(&Highlight) -> bool) -> Vec<Highlight> {
        let (taken, kept): (Vec<_>, Vec<_>) = self.members.drain(..).partition(predicate);
        self.members = kept;
        taken
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Take the rows, e.g. to delete a pruned annotation from persistence
    #[must_use]
    pub fn into_members(self) -> Vec<Highlight> {
        self.members
    }
}

/// Reject an annotation without ranges
pub(crate) fn require_ranges(ranges: &[SectionRange]) -> Result<()> {
    if ranges.is_empty() {
        return Err(EditorError::Core(CoreError::validation(
            "annotation needs at least one range",
        )));
    }
    Ok(())
}
