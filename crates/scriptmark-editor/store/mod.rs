//! Client-side annotation store
//!
//! An explicit state object holding the sections of one script, their
//! annotations, media metadata and the UI selection. The host owns the
//! store and passes it by reference; every mutation is a typed method that
//! returns a `Result` and notifies the store's [`EventChannel`].
//!
//! Annotations live as [`AnnotationGroup`]s. Highlight rows are a view
//! over those groups, so deleting or selecting any row acts on the whole
//! logical annotation.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_core::annotation::CoverageCategory;
//! use scriptmark_core::parser::{number_sections, parse_script, Section};
//! use scriptmark_editor::core::SectionRange;
//! use scriptmark_editor::store::AnnotationStore;
//!
//! let drafts = number_sections("p1", parse_script("SCENE 1\n\nA ferry crosses the river."));
//! let sections: Vec<Section> = drafts
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, d)| Section::from_draft(format!("s{i}"), d))
//!     .collect();
//!
//! let mut store = AnnotationStore::new();
//! store.set_sections(sections).unwrap();
//!
//! let token = store
//!     .begin_annotation(&[SectionRange::new("s1", 2, 7)], CoverageCategory::Media)
//!     .unwrap();
//! assert_eq!(store.highlights_for_section("s1").len(), 1);
//!
//! store.rollback_annotation(&token).unwrap();
//! assert!(store.highlights_for_section("s1").is_empty());
//! ```

pub mod group;
pub mod media;
pub mod ui;

pub use group::AnnotationGroup;
pub use media::{
    FileReference, FileType, HighlightComment, HighlightMedia, MediaFile, MediaForTarget, MediaLink, Profile,
    SectionMedia, UploadStatus,
};
pub use ui::{SidebarTab, UiState};

use crate::core::{EditorError, Result, SectionRange};
use crate::events::{EventChannel, StoreEvent};
use group::{require_ranges, GroupKey};
use scriptmark_core::annotation::{CoverageCategory, GroupId, Highlight, HighlightId};
use scriptmark_core::parser::{sort_sections, Section};
use scriptmark_core::utils::{create_hash_map, FastMap, FastSet};
use scriptmark_core::CoreError;

/// Store tunables
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Drop a selected media annotation without media when the sidebar
    /// closes
    pub prune_orphan_media_highlights: bool,
    /// Prefix of provisional ids handed out by optimistic creates
    pub pending_id_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prune_orphan_media_highlights: true,
            pending_id_prefix: "pending-".to_string(),
        }
    }
}

/// In-memory cache of one script's annotations and UI state
#[derive(Debug)]
pub struct AnnotationStore {
    config: StoreConfig,
    /// Sections in display order
    sections: Vec<Section>,
    /// Annotations in insertion order
    groups: Vec<AnnotationGroup>,
    /// Highlight id to owning group
    owners: FastMap<HighlightId, GroupKey>,
    /// Optimistic creation token to provisional group
    pending: FastMap<String, GroupKey>,
    next_pending: u64,
    highlight_media: Vec<HighlightMedia>,
    section_media: Vec<SectionMedia>,
    media_files: Vec<MediaFile>,
    file_references: Vec<FileReference>,
    comments: Vec<HighlightComment>,
    profiles: FastMap<String, Profile>,
    current_user_id: Option<String>,
    ui: UiState,
    events: EventChannel,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    /// Create an empty store with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            sections: Vec::new(),
            groups: Vec::new(),
            owners: create_hash_map(),
            pending: create_hash_map(),
            next_pending: 1,
            highlight_media: Vec::new(),
            section_media: Vec::new(),
            media_files: Vec::new(),
            file_references: Vec::new(),
            comments: Vec::new(),
            profiles: create_hash_map(),
            current_user_id: None,
            ui: UiState::default(),
            events: EventChannel::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Event channel, for inspecting stats
    #[must_use]
    pub const fn events(&self) -> &EventChannel {
        &self.events
    }

    /// Event channel, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventChannel {
        &mut self.events
    }

    pub(crate) fn emit(&mut self, event: &StoreEvent) -> Result<()> {
        self.events.dispatch(event)
    }

    // Sections

    /// Sections in display order
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Replace the section set
    ///
    /// Sections are sorted by `sort_order`. Highlight rows on sections that
    /// are gone are dropped along with their media links and comments;
    /// section media links and UI selection pointing at dropped sections
    /// are cleared as well.
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_sections(&mut self, mut sections: Vec<Section>) -> Result<()> {
        sort_sections(&mut sections);
        let live: FastSet<String> = sections.iter().map(|s| s.id.clone()).collect();
        self.sections = sections;

        let mut dropped: Vec<HighlightId> = Vec::new();
        for group in &mut self.groups {
            let gone = group.take_members(|h| !live.contains(&h.section_id));
            dropped.extend(gone.into_iter().map(|h| h.id));
        }
        self.forget_empty_groups();
        for id in &dropped {
            self.owners.remove(id);
        }
        let dropped_set: FastSet<&str> = dropped.iter().map(String::as_str).collect();
        self.highlight_media
            .retain(|link| !dropped_set.contains(link.highlight_id.as_str()));
        self.comments
            .retain(|c| !dropped_set.contains(c.highlight_id.as_str()));
        let links_before = self.section_media.len();
        self.section_media
            .retain(|link| live.contains(&link.section_id));

        tracing::info!(
            sections = self.sections.len(),
            dropped_highlights = dropped.len(),
            dropped_section_media = links_before - self.section_media.len(),
            "Sections replaced"
        );

        let selection_changed = self.repair_selection();
        self.emit(&StoreEvent::SectionsReplaced {
            sections: self.sections.len(),
            dropped_highlights: dropped.len(),
        })?;
        if selection_changed {
            self.emit_selection()?;
        }
        Ok(())
    }

    // Annotations

    /// Annotations in insertion order
    #[must_use]
    pub fn groups(&self) -> &[AnnotationGroup] {
        &self.groups
    }

    /// Annotation by id
    ///
    /// A shared `group_id` takes precedence over an ungrouped row with the
    /// same id.
    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<&AnnotationGroup> {
        self.keyed(&GroupKey::Shared(group_id.to_string()))
            .or_else(|| self.keyed(&GroupKey::Single(group_id.to_string())))
    }

    /// Annotation owning a highlight row
    #[must_use]
    pub fn group_of(&self, highlight_id: &str) -> Option<&AnnotationGroup> {
        self.owners.get(highlight_id).and_then(|key| self.keyed(key))
    }

    fn keyed(&self, key: &GroupKey) -> Option<&AnnotationGroup> {
        self.groups.iter().find(|g| g.has_key(key))
    }

    fn keyed_mut(&mut self, key: &GroupKey) -> Option<&mut AnnotationGroup> {
        self.groups.iter_mut().find(|g| g.has_key(key))
    }

    /// Selected annotation, resolved through its primary row when possible
    pub(crate) fn selected_group(&self) -> Option<&AnnotationGroup> {
        let group_id = self.ui.selected_group_id.as_deref()?;
        self.ui
            .selected_highlight_id
            .as_deref()
            .and_then(|id| self.group_of(id))
            .filter(|group| group.id() == group_id)
            .or_else(|| self.group(group_id))
    }

    #[must_use]
    pub fn highlight(&self, highlight_id: &str) -> Option<&Highlight> {
        self.group_of(highlight_id)?
            .members()
            .iter()
            .find(|h| h.id == highlight_id)
    }

    /// Every highlight row, grouped rows adjacent
    pub fn highlights(&self) -> impl Iterator<Item = &Highlight> {
        self.groups.iter().flat_map(AnnotationGroup::members)
    }

    /// Number of highlight rows
    #[must_use]
    pub fn highlight_count(&self) -> usize {
        self.owners.len()
    }

    /// Highlight rows on one section
    #[must_use]
    pub fn highlights_for_section(&self, section_id: &str) -> Vec<&Highlight> {
        self.highlights()
            .filter(|h| h.section_id == section_id)
            .collect()
    }

    /// Owned copies of a section's rows, ready for span resolution
    #[must_use]
    pub fn section_highlight_rows(&self, section_id: &str) -> Vec<Highlight> {
        self.highlights_for_section(section_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Replace every highlight row with persisted data
    ///
    /// Rows on unknown sections are skipped. Pending creates are discarded.
    /// Returns the number of rows kept.
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_highlights(&mut self, rows: Vec<Highlight>) -> Result<usize> {
        self.groups.clear();
        self.owners.clear();
        self.pending.clear();

        let total = rows.len();
        for row in rows {
            if self.section(&row.section_id).is_none() {
                tracing::warn!(highlight = %row.id, section = %row.section_id, "Skipping highlight on unknown section");
                continue;
            }
            self.insert_row(row);
        }
        let kept = self.owners.len();
        tracing::debug!(kept, skipped = total - kept, groups = self.groups.len(), "Highlights replaced");

        let selection_changed = self.repair_selection();
        self.emit(&StoreEvent::AnnotationsReplaced {
            annotations: self.groups.len(),
            highlights: kept,
        })?;
        if selection_changed {
            self.emit_selection()?;
        }
        Ok(kept)
    }

    /// Add a persisted highlight row, replacing a row with the same id
    ///
    /// A row with a `group_id` joins that group if it exists; a row without
    /// one is an annotation of its own.
    ///
    /// # Errors
    /// Returns [`EditorError::SectionNotFound`] if the row's section is not
    /// loaded.
    pub fn add_highlight(&mut self, highlight: Highlight) -> Result<()> {
        if self.section(&highlight.section_id).is_none() {
            return Err(EditorError::section_not_found(highlight.section_id));
        }
        tracing::debug!(
            id = %highlight.id,
            section = %highlight.section_id,
            start = highlight.start_offset,
            end = highlight.end_offset,
            "Highlight added"
        );
        let key = self.insert_row(highlight);
        let (group_id, highlight_ids) = self
            .keyed(&key)
            .map(|group| (group.id().to_string(), group.highlight_ids()))
            .unwrap_or_default();
        self.emit(&StoreEvent::AnnotationAdded {
            group_id,
            highlight_ids,
            pending: false,
        })
    }

    /// Set or clear a highlight's note
    ///
    /// # Errors
    /// Returns [`EditorError::HighlightNotFound`] for an unknown id.
    pub fn update_highlight_note(&mut self, highlight_id: &str, note: Option<String>) -> Result<()> {
        let key = self.owners.get(highlight_id).cloned();
        let row = key
            .and_then(|key| self.keyed_mut(&key))
            .and_then(|group| group.get_mut(highlight_id))
            .ok_or_else(|| EditorError::highlight_not_found(highlight_id))?;
        row.note = note;
        tracing::debug!(id = highlight_id, "Highlight note updated");
        self.emit(&StoreEvent::NoteUpdated {
            highlight_id: highlight_id.to_string(),
        })
    }

    /// Remove the annotation owning a highlight row, all rows included
    ///
    /// # Errors
    /// Returns [`EditorError::HighlightNotFound`] for an unknown id.
    pub fn remove_highlight(&mut self, highlight_id: &str) -> Result<AnnotationGroup> {
        let key = self
            .owners
            .get(highlight_id)
            .cloned()
            .ok_or_else(|| EditorError::highlight_not_found(highlight_id))?;
        self.remove_keyed(&key)
    }

    /// Remove an annotation with its media links and comments
    ///
    /// # Errors
    /// Returns [`EditorError::GroupNotFound`] for an unknown id.
    pub fn remove_group(&mut self, group_id: &str) -> Result<AnnotationGroup> {
        let key = self
            .group(group_id)
            .map(AnnotationGroup::key)
            .ok_or_else(|| EditorError::group_not_found(group_id))?;
        self.remove_keyed(&key)
    }

    pub(crate) fn remove_keyed(&mut self, key: &GroupKey) -> Result<AnnotationGroup> {
        let group = self
            .detach_group(key)
            .ok_or_else(|| CoreError::internal(format!("annotation {key:?} is not cached")))?;
        tracing::debug!(group = group.id(), rows = group.members().len(), "Annotation removed");

        let selection_changed = self.repair_selection();
        self.emit(&StoreEvent::AnnotationRemoved {
            group_id: group.id().to_string(),
            highlight_ids: group.highlight_ids(),
        })?;
        if selection_changed {
            self.emit_selection()?;
        }
        Ok(group)
    }

    // Optimistic creation

    /// Insert a provisional annotation for a mapped selection
    ///
    /// Every range is validated against its section's text. The rows get
    /// provisional ids and, when there is more than one, a shared group id.
    /// Returns the token to confirm or roll back with.
    ///
    /// # Errors
    /// Returns a validation error for an empty range list,
    /// [`EditorError::SectionNotFound`] for an unknown section and
    /// [`EditorError::InvalidRange`] for a range outside its section.
    pub fn begin_annotation(&mut self, ranges: &[SectionRange], category: CoverageCategory) -> Result<String> {
        require_ranges(ranges)?;
        for range in ranges {
            let section = self
                .section(&range.section_id)
                .ok_or_else(|| EditorError::section_not_found(range.section_id.clone()))?;
            range.validate(&section.body)?;
        }

        let token = format!("{}{}", self.config.pending_id_prefix, self.next_pending);
        self.next_pending += 1;

        let group = AnnotationGroup::pending(&token, ranges, category, self.current_user_id.as_deref());
        let key = group.key();
        let group_id = group.id().to_string();
        let highlight_ids = group.highlight_ids();
        for id in &highlight_ids {
            self.owners.insert(id.clone(), key.clone());
        }
        self.groups.push(group);
        self.pending.insert(token.clone(), key);

        tracing::debug!(token = %token, ranges = ranges.len(), category = category.as_str(), "Pending annotation created");
        self.emit(&StoreEvent::AnnotationAdded {
            group_id,
            highlight_ids,
            pending: true,
        })?;
        Ok(token)
    }

    /// Replace a pending annotation with its persisted rows
    ///
    /// Rows are matched to provisional rows by position: media links,
    /// comments and UI selection on provisional ids move to the persisted
    /// ids. Rows whose `group_id` is already cached, e.g. delivered by a
    /// collaborator, join that annotation. Returns the persisted group id.
    ///
    /// # Errors
    /// Returns [`EditorError::PendingNotFound`] for an unknown token, a
    /// validation error if `rows` do not form one annotation and
    /// [`EditorError::SectionNotFound`] for rows on unknown sections. The
    /// pending annotation is untouched on error.
    pub fn confirm_annotation(&mut self, token: &str, rows: Vec<Highlight>) -> Result<GroupId> {
        let Some(pending_key) = self.pending.get(token).cloned() else {
            tracing::warn!(token, "Confirm for unknown pending annotation");
            return Err(EditorError::pending_not_found(token));
        };
        let persisted = AnnotationGroup::from_rows(rows)?;
        if let Some(row) = persisted.members().iter().find(|h| self.section(&h.section_id).is_none()) {
            return Err(EditorError::section_not_found(row.section_id.clone()));
        }

        self.pending.remove(token);
        let provisional = self.take_group(&pending_key);
        let renames: FastMap<HighlightId, HighlightId> = provisional
            .as_ref()
            .map(|group| {
                group
                    .highlight_ids()
                    .into_iter()
                    .zip(persisted.highlight_ids())
                    .collect()
            })
            .unwrap_or_default();
        for link in &mut self.highlight_media {
            if let Some(new_id) = renames.get(&link.highlight_id) {
                link.highlight_id.clone_from(new_id);
            }
        }
        for comment in &mut self.comments {
            if let Some(new_id) = renames.get(&comment.highlight_id) {
                comment.highlight_id.clone_from(new_id);
            }
        }

        // A realtime echo may have delivered some persisted rows already
        for row in persisted.members() {
            self.detach_row(&row.id);
        }

        let key = persisted.key();
        let group_id = persisted.id().to_string();
        for row in persisted.into_members() {
            self.insert_row(row);
        }
        let primary = self.keyed(&key).map(|group| group.primary().id.clone());

        let selection_moved = provisional.as_ref().is_some_and(|group| {
            self.ui
                .selected_highlight_id
                .as_deref()
                .is_some_and(|id| group.contains(id))
        });
        if selection_moved {
            self.ui.selected_group_id = Some(group_id.clone());
            self.ui.selected_highlight_id = primary;
        }
        let selection_changed = self.repair_selection() || selection_moved;

        tracing::debug!(token, group = %group_id, "Pending annotation confirmed");
        self.emit(&StoreEvent::AnnotationConfirmed {
            token: token.to_string(),
            group_id: group_id.clone(),
        })?;
        if selection_changed {
            self.emit_selection()?;
        }
        Ok(group_id)
    }

    /// Discard a pending annotation after a failed save
    ///
    /// # Errors
    /// Returns [`EditorError::PendingNotFound`] for an unknown token.
    pub fn rollback_annotation(&mut self, token: &str) -> Result<AnnotationGroup> {
        let Some(pending_key) = self.pending.get(token).cloned() else {
            tracing::warn!(token, "Rollback for unknown pending annotation");
            return Err(EditorError::pending_not_found(token));
        };
        let group = self
            .detach_group(&pending_key)
            .ok_or_else(|| EditorError::pending_not_found(token))?;
        tracing::debug!(token, "Pending annotation rolled back");

        let selection_changed = self.repair_selection();
        self.emit(&StoreEvent::AnnotationRolledBack {
            token: token.to_string(),
        })?;
        if selection_changed {
            self.emit_selection()?;
        }
        Ok(group)
    }

    /// Tokens of annotations awaiting confirmation
    #[must_use]
    pub fn pending_tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.pending.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    // Internals

    /// Place a row in its group, returning the group key
    fn insert_row(&mut self, row: Highlight) -> GroupKey {
        let target = GroupKey::of(&row);
        if self.owners.get(&row.id) != Some(&target) {
            self.detach_row(&row.id);
        }

        match self.groups.iter_mut().find(|g| g.has_key(&target)) {
            Some(group) => {
                self.owners.insert(row.id.clone(), target.clone());
                group.upsert(row);
            }
            None => {
                self.owners.insert(row.id.clone(), target.clone());
                self.groups.push(AnnotationGroup::single(row));
            }
        }
        target
    }

    /// Remove one row from its group without cascading
    fn detach_row(&mut self, highlight_id: &str) {
        let Some(key) = self.owners.remove(highlight_id) else {
            return;
        };
        if let Some(group) = self.keyed_mut(&key) {
            group.take_members(|h| h.id == highlight_id);
        }
        self.forget_empty_groups();
    }

    /// Remove a group and its ownership entries without cascading
    fn take_group(&mut self, key: &GroupKey) -> Option<AnnotationGroup> {
        let pos = self.groups.iter().position(|g| g.has_key(key))?;
        let group = self.groups.remove(pos);
        for row in group.members() {
            self.owners.remove(&row.id);
        }
        if let Some(token) = group.pending_token() {
            self.pending.remove(token);
        }
        Some(group)
    }

    /// Remove a group with its media links and comments
    fn detach_group(&mut self, key: &GroupKey) -> Option<AnnotationGroup> {
        let group = self.take_group(key)?;
        self.highlight_media.retain(|link| !group.contains(&link.highlight_id));
        self.comments.retain(|c| !group.contains(&c.highlight_id));
        Some(group)
    }

    fn forget_empty_groups(&mut self) {
        let pending = &mut self.pending;
        self.groups.retain(|group| {
            if group.is_empty() {
                if let Some(token) = group.pending_token() {
                    pending.remove(token);
                }
                return false;
            }
            true
        });
    }

    /// Clear selection that points at removed data; true if it changed
    fn repair_selection(&mut self) -> bool {
        let before = self.ui.clone();

        if let Some(section_id) = &self.ui.selected_section_id {
            if self.section(section_id).is_none() {
                self.ui.selected_section_id = None;
                self.ui.sidebar_open = false;
            }
        }

        let group = self.selected_group().map(|g| g.primary().id.clone());
        match group {
            Some(primary) => self.ui.selected_highlight_id = Some(primary),
            None if self.ui.selected_group_id.is_some() => {
                self.ui.selected_group_id = None;
                self.ui.selected_highlight_id = None;
                self.ui.sidebar_open = false;
            }
            None => {}
        }

        self.ui != before
    }
}
