//! Selection and sidebar state

use super::AnnotationStore;
use crate::core::{EditorError, Result};
use crate::events::StoreEvent;
use crate::store::AnnotationGroup;
use scriptmark_core::annotation::{GroupId, HighlightId};
use scriptmark_core::parser::SectionId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sidebar panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SidebarTab {
    /// Linked media
    #[default]
    Media,
    /// Upload a new file
    Upload,
    /// Add a file reference
    Reference,
}

impl SidebarTab {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Upload => "upload",
            Self::Reference => "reference",
        }
    }
}

/// What the user is looking at
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UiState {
    /// Primary highlight of the selected annotation
    pub selected_highlight_id: Option<HighlightId>,
    pub selected_group_id: Option<GroupId>,
    /// Section whose media is shown; exclusive with highlight selection
    pub selected_section_id: Option<SectionId>,
    pub sidebar_open: bool,
    pub sidebar_tab: SidebarTab,
}

impl UiState {
    /// Whether anything is selected
    #[must_use]
    pub const fn has_selection(&self) -> bool {
        self.selected_highlight_id.is_some() || self.selected_section_id.is_some()
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_highlight_id = None;
        self.selected_group_id = None;
        self.selected_section_id = None;
    }
}

impl AnnotationStore {
    /// Current UI state
    #[must_use]
    pub const fn ui(&self) -> &UiState {
        &self.ui
    }

    pub(crate) fn emit_selection(&mut self) -> Result<()> {
        let event = StoreEvent::SelectionChanged {
            highlight_id: self.ui.selected_highlight_id.clone(),
            group_id: self.ui.selected_group_id.clone(),
            section_id: self.ui.selected_section_id.clone(),
        };
        self.emit(&event)
    }

    fn emit_sidebar(&mut self) -> Result<()> {
        let event = StoreEvent::SidebarChanged {
            open: self.ui.sidebar_open,
            tab: self.ui.sidebar_tab.as_str(),
        };
        self.emit(&event)
    }

    /// Select an annotation, or clear the selection with `None`
    ///
    /// Selecting any row of a group selects the whole group and makes its
    /// primary row the selected highlight. The sidebar opens on `tab`
    /// (media by default). Clearing also closes the sidebar.
    ///
    /// # Errors
    /// Returns [`EditorError::HighlightNotFound`] for an unknown id.
    pub fn select_highlight(&mut self, highlight_id: Option<&str>, tab: Option<SidebarTab>) -> Result<()> {
        let tab = tab.unwrap_or_default();
        match highlight_id {
            None => {
                self.ui.clear_selection();
                self.ui.sidebar_open = false;
            }
            Some(id) => {
                let group = self
                    .group_of(id)
                    .ok_or_else(|| EditorError::highlight_not_found(id))?;
                let primary = group.primary().id.clone();
                let group_id = group.id().to_string();
                tracing::debug!(highlight = id, primary = %primary, group = %group_id, "Highlight selected");

                self.ui.selected_highlight_id = Some(primary);
                self.ui.selected_group_id = Some(group_id);
                self.ui.selected_section_id = None;
                self.ui.sidebar_open = true;
            }
        }
        self.ui.sidebar_tab = tab;
        self.emit_selection()?;
        self.emit_sidebar()
    }

    /// Show a section's media, or clear with `None`
    ///
    /// Clears any highlight selection. The sidebar opens on the media tab
    /// when a section is given and closes otherwise.
    ///
    /// # Errors
    /// Returns [`EditorError::SectionNotFound`] for an unknown id.
    pub fn select_section_for_media(&mut self, section_id: Option<&str>) -> Result<()> {
        if let Some(id) = section_id {
            if self.section(id).is_none() {
                return Err(EditorError::section_not_found(id));
            }
        }
        self.ui.selected_highlight_id = None;
        self.ui.selected_group_id = None;
        self.ui.selected_section_id = section_id.map(str::to_string);
        self.ui.sidebar_open = section_id.is_some();
        self.ui.sidebar_tab = SidebarTab::Media;
        self.emit_selection()?;
        self.emit_sidebar()
    }

    /// Open the sidebar without changing the selection
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn open_sidebar(&mut self) -> Result<()> {
        self.ui.sidebar_open = true;
        self.emit_sidebar()
    }

    /// Switch sidebar tab
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_sidebar_tab(&mut self, tab: SidebarTab) -> Result<()> {
        self.ui.sidebar_tab = tab;
        self.emit_sidebar()
    }

    /// Close the sidebar and clear the selection
    ///
    /// A selected media annotation with no media linked to any of its rows
    /// was abandoned mid-creation; it is removed from the cache and
    /// returned so the caller can delete it from persistence. Graphics and
    /// on-camera annotations are kept without media.
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn close_sidebar(&mut self) -> Result<Option<AnnotationGroup>> {
        let orphan = self
            .selected_group()
            .filter(|group| {
                self.config.prune_orphan_media_highlights
                    && group.category().requires_media()
                    && !group.members().iter().any(|h| self.highlight_has_media(&h.id))
            })
            .map(AnnotationGroup::key);

        self.ui.clear_selection();
        self.ui.sidebar_open = false;

        let pruned = match orphan {
            Some(key) => {
                tracing::debug!(group = ?key, "Pruning annotation without media");
                Some(self.remove_keyed(&key)?)
            }
            None => None,
        };

        self.emit_selection()?;
        self.emit_sidebar()?;
        Ok(pruned)
    }
}
