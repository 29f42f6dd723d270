//! Error types for the scriptmark-editor crate
//!
//! Provides the main `EditorError` enum that wraps `CoreError` from
//! scriptmark-core and adds the store and event-channel failures. Selection
//! mapping never fails: an unresolvable selection is `None`, not an error.

use core::fmt;
use scriptmark_core::CoreError;
use thiserror::Error;

/// Main error type for scriptmark-editor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Errors from scriptmark-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Section id not present in the store
    #[error("Section not found: {id}")]
    SectionNotFound { id: String },

    /// Highlight id not present in the store
    #[error("Highlight not found: {id}")]
    HighlightNotFound { id: String },

    /// Annotation group id not present in the store
    #[error("Annotation group not found: {id}")]
    GroupNotFound { id: String },

    /// Optimistic creation token that was never issued or already settled
    #[error("Pending annotation not found: {token}")]
    PendingNotFound { token: String },

    /// Range that cannot be turned into a highlight
    #[error("Invalid range in section {section_id}: start {start}, end {end} (section length: {length})")]
    InvalidRange {
        section_id: String,
        start: usize,
        end: usize,
        length: usize,
    },

    /// Too many event handlers registered
    #[error("Event handler limit reached: {limit}")]
    HandlerLimitReached { limit: usize },

    /// Event channel error
    #[error("Event channel error: {message}")]
    EventChannel { message: String },
}

impl EditorError {
    /// Create a section-not-found error
    pub fn section_not_found(id: impl Into<String>) -> Self {
        Self::SectionNotFound { id: id.into() }
    }

    /// Create a highlight-not-found error
    pub fn highlight_not_found(id: impl Into<String>) -> Self {
        Self::HighlightNotFound { id: id.into() }
    }

    /// Create a group-not-found error
    pub fn group_not_found(id: impl Into<String>) -> Self {
        Self::GroupNotFound { id: id.into() }
    }

    /// Create a pending-not-found error
    pub fn pending_not_found(token: impl Into<String>) -> Self {
        Self::PendingNotFound {
            token: token.into(),
        }
    }

    /// Create an event channel error
    pub fn event_channel<T: fmt::Display>(message: T) -> Self {
        Self::EventChannel {
            message: message.to_string(),
        }
    }

    /// Check if error is recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(core_err) => core_err.is_recoverable(),
            Self::SectionNotFound { .. }
            | Self::HighlightNotFound { .. }
            | Self::GroupNotFound { .. }
            | Self::PendingNotFound { .. }
            | Self::InvalidRange { .. }
            | Self::EventChannel { .. } => true,
            Self::HandlerLimitReached { .. } => false,
        }
    }

    /// Check if this is a lookup failure for an unknown id
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SectionNotFound { .. }
                | Self::HighlightNotFound { .. }
                | Self::GroupNotFound { .. }
                | Self::PendingNotFound { .. }
        )
    }

    /// Get the underlying core error if this wraps one
    #[must_use]
    pub const fn as_core_error(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core_err) => Some(core_err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_core_errors_transparently() {
        let err: EditorError = CoreError::invalid_offset(4, 2, 10).into();
        assert_eq!(
            err.to_string(),
            "Invalid highlight offsets: start 4, end 2 (text length: 10)"
        );
        assert!(err.as_core_error().is_some());
        assert!(err.is_recoverable());
    }

    #[test]
    fn not_found_errors() {
        let err = EditorError::group_not_found("g1");
        assert_eq!(err.to_string(), "Annotation group not found: g1");
        assert!(err.is_not_found());
        assert!(!EditorError::HandlerLimitReached { limit: 4 }.is_recoverable());
    }
}
