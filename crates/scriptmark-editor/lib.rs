//! Selection mapping and annotation state for scriptmark
//!
//! `scriptmark-editor` sits between `scriptmark-core` and a host UI. It
//! turns user selections over rendered sections back into section-relative
//! ranges and keeps the client-side cache of annotations, media metadata
//! and selection state.
//!
//! # Features
//!
//! - **Selection mapping**: multi-section selections become one range per
//!   section, independent of how highlight markup nests
//! - **Pluggable targets**: hosts implement `TextPositionResolver` for their
//!   own widgets; `RenderedView` covers in-memory rendering
//! - **Annotation store**: grouped annotations, media links, comments and
//!   optimistic creation with confirm or rollback
//! - **Change events**: filtered, prioritized handlers for every mutation
//! - **Thread-safe**: optional `SharedStore` behind `parking_lot` locks
//!
//! # Example
//!
//! ```
//! use scriptmark_core::annotation::{compute_render_spans, CoverageCategory};
//! use scriptmark_core::parser::{number_sections, parse_script, Section};
//! use scriptmark_editor::{
//!     map_selection, AnnotationStore, RenderedSection, RenderedView, SelectionDescriptor,
//! };
//!
//! let sections: Vec<Section> = number_sections("p1", parse_script("A ferry crosses the river."))
//!     .into_iter()
//!     .map(|draft| Section::from_draft("s0", draft))
//!     .collect();
//! let mut store = AnnotationStore::new();
//! store.set_sections(sections).unwrap();
//!
//! // Render, select "ferry", annotate
//! let section = &store.sections()[0];
//! let rows = store.section_highlight_rows(&section.id);
//! let spans = compute_render_spans(&section.body, &rows);
//! let view = RenderedView::from_sections(vec![RenderedSection::from_spans(section, &spans)]);
//!
//! let selection = SelectionDescriptor::new(
//!     view.point_at(0, 2).unwrap(),
//!     view.point_at(0, 7).unwrap(),
//!     "ferry",
//! );
//! let ranges = map_selection(&view, &selection).unwrap();
//! let token = store.begin_annotation(&ranges, CoverageCategory::Media).unwrap();
//!
//! assert_eq!(store.highlights_for_section("s0")[0].start_offset, 2);
//! assert_eq!(store.pending_tokens(), vec![token.as_str()]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod core;
pub mod events;
pub mod selection;
pub mod store;

#[cfg(feature = "multi-thread")]
pub mod sync;

pub use scriptmark_core::annotation::{Highlight, RenderSpan};
pub use scriptmark_core::parser::{Section, SectionType};

pub use crate::core::{EditorError, Result, SectionRange, SelectionRect};
pub use events::{
    EventChannel, EventChannelConfig, EventFilter, EventHandler, EventStats, StoreEvent, StoreEventKind,
};
pub use selection::{
    map_selection, InlineNode, NodePoint, RenderedSection, RenderedView, SelectionDescriptor, SelectionState,
    SelectionTracker, TextPositionResolver, TextSelection, ViewPoint,
};
pub use store::{
    AnnotationGroup, AnnotationStore, FileReference, HighlightComment, HighlightMedia, MediaFile, MediaForTarget,
    Profile, SectionMedia, SidebarTab, StoreConfig, UiState,
};

#[cfg(feature = "multi-thread")]
pub use sync::SharedStore;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
