//! Store change notifications
//!
//! Provides `StoreEvent` for describing annotation store mutations and
//! `EventChannel` for distributing them to registered handlers with
//! per-handler filtering and priorities.

use crate::core::{EditorError, Result};
use scriptmark_core::annotation::{GroupId, HighlightId};
use scriptmark_core::parser::SectionId;

/// Kinds of store events, used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEventKind {
    SectionsReplaced,
    AnnotationsReplaced,
    AnnotationAdded,
    AnnotationRemoved,
    AnnotationConfirmed,
    AnnotationRolledBack,
    NoteUpdated,
    HighlightMediaChanged,
    SectionMediaChanged,
    LibraryChanged,
    CommentsChanged,
    ProfilesChanged,
    SelectionChanged,
    SidebarChanged,
}

/// A mutation of the annotation store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The section set was replaced
    SectionsReplaced {
        sections: usize,
        /// Highlight rows dropped because their section disappeared
        dropped_highlights: usize,
    },

    /// The whole highlight set was replaced
    AnnotationsReplaced { annotations: usize, highlights: usize },

    /// An annotation was added, optimistically or from persisted rows
    AnnotationAdded {
        group_id: GroupId,
        highlight_ids: Vec<HighlightId>,
        pending: bool,
    },

    /// An annotation and all its rows were removed
    AnnotationRemoved {
        group_id: GroupId,
        highlight_ids: Vec<HighlightId>,
    },

    /// A pending annotation was replaced by its persisted rows
    AnnotationConfirmed { token: String, group_id: GroupId },

    /// A pending annotation was discarded
    AnnotationRolledBack { token: String },

    /// A highlight note changed
    NoteUpdated { highlight_id: HighlightId },

    /// Media links of a highlight changed; `None` when the whole link set
    /// was replaced
    HighlightMediaChanged { highlight_id: Option<HighlightId> },

    /// Media links of a section changed; `None` when the whole link set
    /// was replaced
    SectionMediaChanged { section_id: Option<SectionId> },

    /// Uploaded files or file references changed
    LibraryChanged {
        media_files: usize,
        file_references: usize,
    },

    /// Comments changed; `None` when the whole comment set was replaced
    CommentsChanged { highlight_id: Option<HighlightId> },

    /// Collaborator profiles or the current user changed
    ProfilesChanged,

    /// Highlight, group or section selection changed
    SelectionChanged {
        highlight_id: Option<HighlightId>,
        group_id: Option<GroupId>,
        section_id: Option<SectionId>,
    },

    /// Sidebar opened, closed or switched tab
    SidebarChanged { open: bool, tab: &'static str },
}

impl StoreEvent {
    /// Event kind
    #[must_use]
    pub const fn kind(&self) -> StoreEventKind {
        match self {
            Self::SectionsReplaced { .. } => StoreEventKind::SectionsReplaced,
            Self::AnnotationsReplaced { .. } => StoreEventKind::AnnotationsReplaced,
            Self::AnnotationAdded { .. } => StoreEventKind::AnnotationAdded,
            Self::AnnotationRemoved { .. } => StoreEventKind::AnnotationRemoved,
            Self::AnnotationConfirmed { .. } => StoreEventKind::AnnotationConfirmed,
            Self::AnnotationRolledBack { .. } => StoreEventKind::AnnotationRolledBack,
            Self::NoteUpdated { .. } => StoreEventKind::NoteUpdated,
            Self::HighlightMediaChanged { .. } => StoreEventKind::HighlightMediaChanged,
            Self::SectionMediaChanged { .. } => StoreEventKind::SectionMediaChanged,
            Self::LibraryChanged { .. } => StoreEventKind::LibraryChanged,
            Self::CommentsChanged { .. } => StoreEventKind::CommentsChanged,
            Self::ProfilesChanged => StoreEventKind::ProfilesChanged,
            Self::SelectionChanged { .. } => StoreEventKind::SelectionChanged,
            Self::SidebarChanged { .. } => StoreEventKind::SidebarChanged,
        }
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::SectionsReplaced {
                sections,
                dropped_highlights,
            } => format!("Replaced sections: {sections} kept, {dropped_highlights} highlights dropped"),
            Self::AnnotationsReplaced {
                annotations,
                highlights,
            } => format!("Loaded {annotations} annotations ({highlights} highlights)"),
            Self::AnnotationAdded {
                group_id,
                highlight_ids,
                pending,
            } => {
                let state = if *pending { "pending" } else { "persisted" };
                format!(
                    "Added {state} annotation '{group_id}' ({} ranges)",
                    highlight_ids.len()
                )
            }
            Self::AnnotationRemoved {
                group_id,
                highlight_ids,
            } => format!(
                "Removed annotation '{group_id}' ({} ranges)",
                highlight_ids.len()
            ),
            Self::AnnotationConfirmed { token, group_id } => {
                format!("Confirmed pending annotation '{token}' as '{group_id}'")
            }
            Self::AnnotationRolledBack { token } => {
                format!("Rolled back pending annotation '{token}'")
            }
            Self::NoteUpdated { highlight_id } => format!("Updated note on '{highlight_id}'"),
            Self::HighlightMediaChanged { highlight_id } => match highlight_id {
                Some(id) => format!("Media changed on highlight '{id}'"),
                None => "Highlight media replaced".to_string(),
            },
            Self::SectionMediaChanged { section_id } => match section_id {
                Some(id) => format!("Media changed on section '{id}'"),
                None => "Section media replaced".to_string(),
            },
            Self::LibraryChanged {
                media_files,
                file_references,
            } => format!("Library now has {media_files} files and {file_references} references"),
            Self::CommentsChanged { highlight_id } => match highlight_id {
                Some(id) => format!("Comments changed on '{id}'"),
                None => "Comments replaced".to_string(),
            },
            Self::ProfilesChanged => "Profiles changed".to_string(),
            Self::SelectionChanged { .. } => "Selection changed".to_string(),
            Self::SidebarChanged { open, tab } => {
                if *open {
                    format!("Sidebar opened on '{tab}'")
                } else {
                    "Sidebar closed".to_string()
                }
            }
        }
    }

    /// Check if this event changes cached data rather than UI state
    #[must_use]
    pub const fn is_data_change(&self) -> bool {
        !self.is_ui_change()
    }

    /// Check if this event only changes selection or sidebar state
    #[must_use]
    pub const fn is_ui_change(&self) -> bool {
        matches!(
            self,
            Self::SelectionChanged { .. } | Self::SidebarChanged { .. }
        )
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Kinds to include (empty means all kinds)
    include_kinds: Vec<StoreEventKind>,
    /// Kinds to exclude
    exclude_kinds: Vec<StoreEventKind>,
    /// Whether to include UI-only events
    include_ui: Option<bool>,
}

impl EventFilter {
    /// Create a filter that accepts all events
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include specific kinds
    #[must_use]
    pub fn include_kinds(mut self, kinds: Vec<StoreEventKind>) -> Self {
        self.include_kinds = kinds;
        self
    }

    /// Exclude specific kinds
    #[must_use]
    pub fn exclude_kinds(mut self, kinds: Vec<StoreEventKind>) -> Self {
        self.exclude_kinds = kinds;
        self
    }

    /// Set whether to include selection and sidebar events
    #[must_use]
    pub const fn include_ui(mut self, include: bool) -> Self {
        self.include_ui = Some(include);
        self
    }

    /// Check if an event passes this filter
    #[must_use]
    pub fn matches(&self, event: &StoreEvent) -> bool {
        let kind = event.kind();

        if self.exclude_kinds.contains(&kind) {
            return false;
        }

        if !self.include_kinds.is_empty() && !self.include_kinds.contains(&kind) {
            return false;
        }

        if let Some(include_ui) = self.include_ui {
            if event.is_ui_change() != include_ui {
                return false;
            }
        }

        true
    }
}

/// Handler for store events
pub trait EventHandler: Send + Sync {
    /// Handle a store event
    ///
    /// # Errors
    /// A returned error stops dispatch and is propagated to the mutating
    /// call.
    fn handle_event(&mut self, event: &StoreEvent) -> Result<()>;

    /// Get the event filter for this handler
    fn event_filter(&self) -> EventFilter {
        EventFilter::new()
    }

    /// Get handler priority (higher numbers run first)
    fn priority(&self) -> i32 {
        0
    }
}

/// Statistics about event handling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventStats {
    /// Total number of events dispatched
    pub events_dispatched: usize,
    /// Number of handlers currently registered
    pub handlers_count: usize,
    /// Number of handler deliveries skipped by filters
    pub events_filtered: usize,
}

/// Event channel configuration
#[derive(Debug, Clone)]
pub struct EventChannelConfig {
    /// Maximum number of handlers
    pub max_handlers: usize,
    /// Whether to log every dispatched event at debug level
    pub enable_logging: bool,
}

impl Default for EventChannelConfig {
    fn default() -> Self {
        Self {
            max_handlers: 100,
            enable_logging: false,
        }
    }
}

/// Information about a registered handler
struct HandlerInfo {
    id: usize,
    handler: Box<dyn EventHandler>,
    filter: EventFilter,
    priority: i32,
    events_processed: usize,
}

impl core::fmt::Debug for HandlerInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerInfo")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("priority", &self.priority)
            .field("events_processed", &self.events_processed)
            .field("handler", &"<EventHandler>")
            .finish()
    }
}

/// Event channel for distributing store events to handlers
#[derive(Debug, Default)]
pub struct EventChannel {
    config: EventChannelConfig,
    handlers: Vec<HandlerInfo>,
    stats: EventStats,
    next_handler_id: usize,
}

impl EventChannel {
    /// Create a new event channel with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new event channel with custom configuration
    #[must_use]
    pub fn with_config(config: EventChannelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register an event handler
    ///
    /// # Errors
    /// Returns [`EditorError::HandlerLimitReached`] when the channel is full.
    pub fn register_handler(&mut self, handler: Box<dyn EventHandler>) -> Result<usize> {
        if self.handlers.len() >= self.config.max_handlers {
            return Err(EditorError::HandlerLimitReached {
                limit: self.config.max_handlers,
            });
        }

        let id = self.next_handler_id;
        self.next_handler_id += 1;

        let filter = handler.event_filter();
        let priority = handler.priority();
        self.handlers.push(HandlerInfo {
            id,
            handler,
            filter,
            priority,
            events_processed: 0,
        });
        // Stable, so equal priorities keep registration order
        self.handlers.sort_by(|a, b| b.priority.cmp(&a.priority));

        self.stats.handlers_count = self.handlers.len();
        Ok(id)
    }

    /// Unregister an event handler by id
    pub fn unregister_handler(&mut self, handler_id: usize) -> bool {
        let Some(pos) = self.handlers.iter().position(|h| h.id == handler_id) else {
            return false;
        };
        self.handlers.remove(pos);
        self.stats.handlers_count = self.handlers.len();
        true
    }

    /// Dispatch an event to all matching handlers
    ///
    /// # Errors
    /// Returns the first handler error, wrapped as
    /// [`EditorError::EventChannel`] unless it already is one.
    pub fn dispatch(&mut self, event: &StoreEvent) -> Result<()> {
        self.stats.events_dispatched += 1;

        let mut processed = 0;
        let mut filtered = 0;
        for info in &mut self.handlers {
            if !info.filter.matches(event) {
                filtered += 1;
                continue;
            }
            info.handler.handle_event(event).map_err(|err| match err {
                EditorError::EventChannel { .. } => err,
                other => EditorError::event_channel(format!(
                    "handler {} failed on {:?}: {other}",
                    info.id,
                    event.kind()
                )),
            })?;
            info.events_processed += 1;
            processed += 1;
        }
        self.stats.events_filtered += filtered;

        if self.config.enable_logging {
            tracing::debug!(
                event = %event.description(),
                processed,
                filtered,
                "Store event dispatched"
            );
        }
        Ok(())
    }

    /// Get event statistics
    #[must_use]
    pub const fn stats(&self) -> &EventStats {
        &self.stats
    }

    /// Remove every handler
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
        self.stats.handlers_count = 0;
    }
}
