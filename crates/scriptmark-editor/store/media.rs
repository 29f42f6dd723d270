//! Media, comment and profile rows
//!
//! The store caches these rows as the persistence layer returns them. Link
//! rows attach either an uploaded file or an external file reference to a
//! highlight or a whole section.

use super::AnnotationStore;
use crate::core::{EditorError, Result};
use crate::events::StoreEvent;
use scriptmark_core::annotation::HighlightId;
use scriptmark_core::parser::{ProjectId, SectionId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upload lifecycle of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UploadStatus {
    #[default]
    Uploading,
    Complete,
    Failed,
}

/// An uploaded file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MediaFile {
    pub id: String,
    pub project_id: ProjectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub uploaded_by: Option<String>,
    /// Object key in blob storage
    pub storage_path: String,
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration_secs: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thumbnail_path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upload_status: UploadStatus,
}

impl MediaFile {
    /// Create a file row that is still uploading
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<ProjectId>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let filename = filename.into();
        Self {
            storage_path: format!("{id}/{filename}"),
            id,
            project_id: project_id.into(),
            uploaded_by: None,
            filename,
            mime_type: mime_type.into(),
            size_bytes: 0,
            width: None,
            height: None,
            duration_secs: None,
            thumbnail_path: None,
            upload_status: UploadStatus::Uploading,
        }
    }

    /// Whether the upload finished
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.upload_status == UploadStatus::Complete
    }

    #[must_use]
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Kind of an externally stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FileType {
    Video,
    Image,
    Audio,
    #[default]
    Other,
}

/// A file that lives outside the project, described by location
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileReference {
    pub id: String,
    pub project_id: ProjectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_by: Option<String>,
    pub filename: String,
    /// Drive path, archive shelf or URL
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_type: FileType,
}

impl FileReference {
    pub fn new(id: impl Into<String>, project_id: impl Into<ProjectId>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            created_by: None,
            filename: filename.into(),
            location: None,
            description: None,
            file_type: FileType::Other,
        }
    }
}

/// Link from a highlight to a file or file reference
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HighlightMedia {
    pub id: String,
    pub highlight_id: HighlightId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub media_file_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_reference_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_order: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub note: Option<String>,
}

impl HighlightMedia {
    /// Link an uploaded file
    pub fn file(id: impl Into<String>, highlight_id: impl Into<HighlightId>, media_file_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            highlight_id: highlight_id.into(),
            media_file_id: Some(media_file_id.into()),
            file_reference_id: None,
            sort_order: 0,
            note: None,
        }
    }

    /// Link a file reference
    pub fn reference(
        id: impl Into<String>,
        highlight_id: impl Into<HighlightId>,
        file_reference_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            highlight_id: highlight_id.into(),
            media_file_id: None,
            file_reference_id: Some(file_reference_id.into()),
            sort_order: 0,
            note: None,
        }
    }
}

/// Link from a whole section to a file or file reference
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionMedia {
    pub id: String,
    pub section_id: SectionId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub media_file_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub file_reference_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub added_by: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sort_order: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_preferred: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub note: Option<String>,
}

impl SectionMedia {
    /// Link an uploaded file
    pub fn file(id: impl Into<String>, section_id: impl Into<SectionId>, media_file_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            media_file_id: Some(media_file_id.into()),
            file_reference_id: None,
            added_by: None,
            sort_order: 0,
            is_preferred: false,
            note: None,
        }
    }

    /// Link a file reference
    pub fn reference(
        id: impl Into<String>,
        section_id: impl Into<SectionId>,
        file_reference_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            section_id: section_id.into(),
            media_file_id: None,
            file_reference_id: Some(file_reference_id.into()),
            added_by: None,
            sort_order: 0,
            is_preferred: false,
            note: None,
        }
    }
}

/// A discussion comment on a highlight
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HighlightComment {
    pub id: String,
    pub highlight_id: HighlightId,
    pub user_id: String,
    pub body: String,
}

/// Display data for a user
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Profile {
    pub id: String,
    pub display_name: String,
}

/// Shared shape of highlight and section link rows
pub trait MediaLink {
    fn media_file_id(&self) -> Option<&str>;
    fn file_reference_id(&self) -> Option<&str>;
}

impl MediaLink for HighlightMedia {
    fn media_file_id(&self) -> Option<&str> {
        self.media_file_id.as_deref()
    }

    fn file_reference_id(&self) -> Option<&str> {
        self.file_reference_id.as_deref()
    }
}

impl MediaLink for SectionMedia {
    fn media_file_id(&self) -> Option<&str> {
        self.media_file_id.as_deref()
    }

    fn file_reference_id(&self) -> Option<&str> {
        self.file_reference_id.as_deref()
    }
}

/// Media attached to one highlight or section
#[derive(Debug, Clone, PartialEq)]
pub struct MediaForTarget<'a, L> {
    /// Uploaded files, in link order; links to unknown files are skipped
    pub uploaded: Vec<&'a MediaFile>,
    /// File references, in link order; links to unknown references are skipped
    pub references: Vec<&'a FileReference>,
    /// The link rows themselves
    pub entries: Vec<&'a L>,
}

impl<L> MediaForTarget<'_, L> {
    /// Whether nothing is linked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn upsert_by_id<T>(rows: &mut Vec<T>, row: T, id: impl Fn(&T) -> &str) {
    match rows.iter().position(|r| id(r) == id(&row)) {
        Some(pos) => rows[pos] = row,
        None => rows.push(row),
    }
}

fn remove_by_id<T>(rows: &mut Vec<T>, target: &str, id: impl Fn(&T) -> &str) -> Option<T> {
    let pos = rows.iter().position(|r| id(r) == target)?;
    Some(rows.remove(pos))
}

impl AnnotationStore {
    fn emit_library(&mut self) -> Result<()> {
        let event = StoreEvent::LibraryChanged {
            media_files: self.media_files.len(),
            file_references: self.file_references.len(),
        };
        self.emit(&event)
    }

    /// Replace the cached media files
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_media_files(&mut self, files: Vec<MediaFile>) -> Result<()> {
        tracing::debug!(count = files.len(), "Media files replaced");
        self.media_files = files;
        self.emit_library()
    }

    /// Add a media file, replacing a row with the same id
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn add_media_file(&mut self, file: MediaFile) -> Result<()> {
        tracing::debug!(id = %file.id, filename = %file.filename, "Media file added");
        upsert_by_id(&mut self.media_files, file, |f| f.id.as_str());
        self.emit_library()
    }

    /// Record a new upload status for a file
    ///
    /// # Errors
    /// Returns a validation error for an unknown file id.
    pub fn set_upload_status(&mut self, file_id: &str, status: UploadStatus) -> Result<()> {
        let Some(file) = self.media_files.iter_mut().find(|f| f.id == file_id) else {
            return Err(EditorError::Core(scriptmark_core::CoreError::validation(format!(
                "unknown media file '{file_id}'"
            ))));
        };
        file.upload_status = status;
        tracing::debug!(id = file_id, ?status, "Upload status changed");
        self.emit_library()
    }

    /// Remove a media file and every link row pointing at it
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn remove_media_file(&mut self, file_id: &str) -> Result<Option<MediaFile>> {
        let removed = remove_by_id(&mut self.media_files, file_id, |f| f.id.as_str());
        let before = self.highlight_media.len() + self.section_media.len();
        self.highlight_media
            .retain(|link| link.media_file_id.as_deref() != Some(file_id));
        self.section_media
            .retain(|link| link.media_file_id.as_deref() != Some(file_id));
        let unlinked = before - self.highlight_media.len() - self.section_media.len();
        tracing::debug!(id = file_id, unlinked, "Media file removed");

        self.emit_library()?;
        if unlinked > 0 {
            self.emit(&StoreEvent::HighlightMediaChanged { highlight_id: None })?;
            self.emit(&StoreEvent::SectionMediaChanged { section_id: None })?;
        }
        Ok(removed)
    }

    /// Replace the cached file references
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_file_references(&mut self, references: Vec<FileReference>) -> Result<()> {
        tracing::debug!(count = references.len(), "File references replaced");
        self.file_references = references;
        self.emit_library()
    }

    /// Add a file reference, replacing a row with the same id
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn add_file_reference(&mut self, reference: FileReference) -> Result<()> {
        tracing::debug!(id = %reference.id, "File reference added");
        upsert_by_id(&mut self.file_references, reference, |f| f.id.as_str());
        self.emit_library()
    }

    /// Remove a file reference and every link row pointing at it
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn remove_file_reference(&mut self, reference_id: &str) -> Result<Option<FileReference>> {
        let removed = remove_by_id(&mut self.file_references, reference_id, |f| f.id.as_str());
        let before = self.highlight_media.len() + self.section_media.len();
        self.highlight_media
            .retain(|link| link.file_reference_id.as_deref() != Some(reference_id));
        self.section_media
            .retain(|link| link.file_reference_id.as_deref() != Some(reference_id));
        let unlinked = before - self.highlight_media.len() - self.section_media.len();
        tracing::debug!(id = reference_id, unlinked, "File reference removed");

        self.emit_library()?;
        if unlinked > 0 {
            self.emit(&StoreEvent::HighlightMediaChanged { highlight_id: None })?;
            self.emit(&StoreEvent::SectionMediaChanged { section_id: None })?;
        }
        Ok(removed)
    }

    /// Replace all highlight media links
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_highlight_media(&mut self, links: Vec<HighlightMedia>) -> Result<()> {
        tracing::debug!(count = links.len(), "Highlight media replaced");
        self.highlight_media = links;
        self.emit(&StoreEvent::HighlightMediaChanged { highlight_id: None })
    }

    /// Link media to a highlight
    ///
    /// # Errors
    /// Returns [`EditorError::HighlightNotFound`] for an unknown highlight.
    pub fn add_highlight_media(&mut self, link: HighlightMedia) -> Result<()> {
        if !self.owners.contains_key(&link.highlight_id) {
            return Err(EditorError::highlight_not_found(link.highlight_id));
        }
        let highlight_id = link.highlight_id.clone();
        tracing::debug!(id = %link.id, highlight = %highlight_id, "Highlight media linked");
        upsert_by_id(&mut self.highlight_media, link, |l| l.id.as_str());
        self.emit(&StoreEvent::HighlightMediaChanged {
            highlight_id: Some(highlight_id),
        })
    }

    /// Remove a highlight media link
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn remove_highlight_media(&mut self, link_id: &str) -> Result<Option<HighlightMedia>> {
        let removed = remove_by_id(&mut self.highlight_media, link_id, |l| l.id.as_str());
        if let Some(link) = &removed {
            tracing::debug!(id = link_id, highlight = %link.highlight_id, "Highlight media unlinked");
            self.emit(&StoreEvent::HighlightMediaChanged {
                highlight_id: Some(link.highlight_id.clone()),
            })?;
        }
        Ok(removed)
    }

    /// Replace all section media links
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_section_media(&mut self, links: Vec<SectionMedia>) -> Result<()> {
        tracing::debug!(count = links.len(), "Section media replaced");
        self.section_media = links;
        self.emit(&StoreEvent::SectionMediaChanged { section_id: None })
    }

    /// Link media to a section
    ///
    /// # Errors
    /// Returns [`EditorError::SectionNotFound`] for an unknown section.
    pub fn add_section_media(&mut self, link: SectionMedia) -> Result<()> {
        if self.section(&link.section_id).is_none() {
            return Err(EditorError::section_not_found(link.section_id));
        }
        let section_id = link.section_id.clone();
        tracing::debug!(id = %link.id, section = %section_id, "Section media linked");
        upsert_by_id(&mut self.section_media, link, |l| l.id.as_str());
        self.emit(&StoreEvent::SectionMediaChanged {
            section_id: Some(section_id),
        })
    }

    /// Remove a section media link
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn remove_section_media(&mut self, link_id: &str) -> Result<Option<SectionMedia>> {
        let removed = remove_by_id(&mut self.section_media, link_id, |l| l.id.as_str());
        if let Some(link) = &removed {
            tracing::debug!(id = link_id, section = %link.section_id, "Section media unlinked");
            self.emit(&StoreEvent::SectionMediaChanged {
                section_id: Some(link.section_id.clone()),
            })?;
        }
        Ok(removed)
    }

    /// Replace all comments
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_comments(&mut self, comments: Vec<HighlightComment>) -> Result<()> {
        tracing::debug!(count = comments.len(), "Comments replaced");
        self.comments = comments;
        self.emit(&StoreEvent::CommentsChanged { highlight_id: None })
    }

    /// Add a comment to a highlight
    ///
    /// # Errors
    /// Returns [`EditorError::HighlightNotFound`] for an unknown highlight.
    pub fn add_comment(&mut self, comment: HighlightComment) -> Result<()> {
        if !self.owners.contains_key(&comment.highlight_id) {
            return Err(EditorError::highlight_not_found(comment.highlight_id));
        }
        let highlight_id = comment.highlight_id.clone();
        tracing::debug!(id = %comment.id, highlight = %highlight_id, "Comment added");
        upsert_by_id(&mut self.comments, comment, |c| c.id.as_str());
        self.emit(&StoreEvent::CommentsChanged {
            highlight_id: Some(highlight_id),
        })
    }

    /// Remove a comment
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn remove_comment(&mut self, comment_id: &str) -> Result<Option<HighlightComment>> {
        let removed = remove_by_id(&mut self.comments, comment_id, |c| c.id.as_str());
        if let Some(comment) = &removed {
            tracing::debug!(id = comment_id, "Comment removed");
            self.emit(&StoreEvent::CommentsChanged {
                highlight_id: Some(comment.highlight_id.clone()),
            })?;
        }
        Ok(removed)
    }

    /// Replace the profile cache
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_profiles(&mut self, profiles: impl IntoIterator<Item = Profile>) -> Result<()> {
        self.profiles = profiles.into_iter().map(|p| (p.id.clone(), p)).collect();
        tracing::debug!(count = self.profiles.len(), "Profiles replaced");
        self.emit(&StoreEvent::ProfilesChanged)
    }

    /// Set the signed-in user
    ///
    /// # Errors
    /// Propagates event handler failures.
    pub fn set_current_user_id(&mut self, user_id: Option<String>) -> Result<()> {
        self.current_user_id = user_id;
        self.emit(&StoreEvent::ProfilesChanged)
    }

    #[must_use]
    pub fn media_files(&self) -> &[MediaFile] {
        &self.media_files
    }

    #[must_use]
    pub fn file_references(&self) -> &[FileReference] {
        &self.file_references
    }

    #[must_use]
    pub fn comments(&self) -> &[HighlightComment] {
        &self.comments
    }

    #[must_use]
    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    /// Profile for a user id
    #[must_use]
    pub fn profile(&self, user_id: &str) -> Option<&Profile> {
        self.profiles.get(user_id)
    }

    /// Display name for a user id
    #[must_use]
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.profile(user_id).map(|p| p.display_name.as_str())
    }

    fn resolve_links<'a, L: MediaLink>(&'a self, entries: Vec<&'a L>) -> MediaForTarget<'a, L> {
        let uploaded = entries
            .iter()
            .filter_map(|e| e.media_file_id())
            .filter_map(|id| self.media_files.iter().find(|f| f.id == id))
            .collect();
        let references = entries
            .iter()
            .filter_map(|e| e.file_reference_id())
            .filter_map(|id| self.file_references.iter().find(|f| f.id == id))
            .collect();
        MediaForTarget {
            uploaded,
            references,
            entries,
        }
    }

    /// Files and references linked to a highlight
    #[must_use]
    pub fn media_for_highlight(&self, highlight_id: &str) -> MediaForTarget<'_, HighlightMedia> {
        let entries = self
            .highlight_media
            .iter()
            .filter(|link| link.highlight_id == highlight_id)
            .collect();
        self.resolve_links(entries)
    }

    /// Files and references linked to a section
    #[must_use]
    pub fn media_for_section(&self, section_id: &str) -> MediaForTarget<'_, SectionMedia> {
        let entries = self
            .section_media
            .iter()
            .filter(|link| link.section_id == section_id)
            .collect();
        self.resolve_links(entries)
    }

    /// Number of media links on a section
    #[must_use]
    pub fn section_media_count(&self, section_id: &str) -> usize {
        self.section_media
            .iter()
            .filter(|link| link.section_id == section_id)
            .count()
    }

    /// Whether a highlight has at least one media link
    #[must_use]
    pub fn highlight_has_media(&self, highlight_id: &str) -> bool {
        self.highlight_media
            .iter()
            .any(|link| link.highlight_id == highlight_id)
    }

    /// Comments on a highlight, in insertion order
    #[must_use]
    pub fn comments_for_highlight(&self, highlight_id: &str) -> Vec<&HighlightComment> {
        self.comments
            .iter()
            .filter(|c| c.highlight_id == highlight_id)
            .collect()
    }
}
