//! End-to-end annotation workflow
//!
//! Parses a script, renders it, annotates selections across sections and
//! walks the media sidebar the way a host UI drives the store.

use pretty_assertions::assert_eq;
use scriptmark_core::annotation::{compute_render_spans, CoverageCategory, CoveragePalette};
use scriptmark_core::parser::{number_sections, parse_script, Section};
use scriptmark_editor::events::{EventFilter, EventHandler, StoreEvent, StoreEventKind};
use scriptmark_editor::selection::ViewPoint;
use scriptmark_editor::store::{FileReference, HighlightMedia, MediaFile};
use scriptmark_editor::{
    AnnotationStore, EditorError, RenderedSection, RenderedView, Result, SelectionDescriptor, SelectionTracker,
    SidebarTab,
};
use std::sync::{Arc, Mutex};

const SCRIPT: &str = "\
SCENE 1

A ferry crosses the river at dawn.

Passengers crowd the rail.

SCENE 2

The harbour wakes up.";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn load() -> AnnotationStore {
    init_tracing();
    let sections: Vec<Section> = number_sections("p1", parse_script(SCRIPT))
        .into_iter()
        .enumerate()
        .map(|(i, draft)| Section::from_draft(format!("s{i}"), draft))
        .collect();
    let mut store = AnnotationStore::new();
    store.set_sections(sections).unwrap();
    store
}

fn render(store: &AnnotationStore) -> RenderedView {
    let mut view = RenderedView::new();
    for section in store.sections() {
        let rows = store.section_highlight_rows(&section.id);
        let spans = compute_render_spans(&section.body, &rows);
        view.push(RenderedSection::from_spans(section, &spans));
    }
    view
}

fn point(view: &RenderedView, section: &str, offset: usize) -> ViewPoint {
    let index = view.position(section).unwrap();
    view.point_at(index, offset).unwrap()
}

#[derive(Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl EventHandler for Log {
    fn handle_event(&mut self, event: &StoreEvent) -> Result<()> {
        self.0.lock().unwrap().push(event.description());
        Ok(())
    }

    fn event_filter(&self) -> EventFilter {
        EventFilter::new().include_kinds(vec![
            StoreEventKind::AnnotationAdded,
            StoreEventKind::AnnotationConfirmed,
            StoreEventKind::AnnotationRemoved,
        ])
    }
}

#[test]
fn parsed_script_loads_in_order() {
    let store = load();
    let ids: Vec<&str> = store.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s0", "s1", "s2", "s3", "s4"]);
    assert_eq!(store.sections()[3].title.as_deref(), Some("SCENE 2"));
}

#[test]
fn annotate_across_a_heading() {
    let mut store = load();
    let log = Log::default();
    let seen = Arc::clone(&log.0);
    store.events_mut().register_handler(Box::new(log)).unwrap();

    // "dawn." through "The harbour", skipping the two headings in between
    let view = render(&store);
    let selection = SelectionDescriptor::new(
        point(&view, "s1", 29),
        point(&view, "s4", 11),
        "dawn.\nPassengers crowd the rail.\nSCENE 2\nThe harbour",
    );
    let mut tracker = SelectionTracker::new();
    let ranges = tracker.update(&view, &selection).unwrap().ranges.clone();
    let described: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    assert_eq!(described, vec!["s1[29..34)", "s2[0..26)", "s4[0..11)"]);

    let selected = tracker.complete().unwrap();
    let token = store
        .begin_annotation(&selected.ranges, CoverageCategory::Graphics)
        .unwrap();
    let pending = store.group(&token).unwrap();
    assert_eq!(pending.members().len(), 3);
    assert!(pending.is_pending());

    let persisted = selected
        .ranges
        .iter()
        .enumerate()
        .map(|(i, range)| range.to_highlight(format!("h{i}"), CoverageCategory::Graphics).with_group("g1"))
        .collect();
    assert_eq!(store.confirm_annotation(&token, persisted).unwrap(), "g1");

    // Re-rendering shows the annotation in each touched section
    let view = render(&store);
    let marked = |section: &str| {
        let index = view.position(section).unwrap();
        view.sections()[index].nodes.len()
    };
    assert_eq!(marked("s1"), 2);
    assert_eq!(marked("s2"), 1);
    assert_eq!(marked("s4"), 2);

    // Deleting one row removes the whole annotation
    store.remove_highlight("h1").unwrap();
    assert_eq!(store.highlight_count(), 0);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            format!("Added pending annotation '{token}' (3 ranges)"),
            format!("Confirmed pending annotation '{token}' as 'g1'"),
            "Removed annotation 'g1' (3 ranges)".to_string(),
        ]
    );
}

#[test]
fn media_sidebar_flow() {
    let mut store = load();
    let view = render(&store);
    let selection = SelectionDescriptor::new(point(&view, "s1", 2), point(&view, "s1", 7), "ferry");
    let mut tracker = SelectionTracker::new();
    tracker.update(&view, &selection);
    let ranges = tracker.complete().unwrap().ranges;

    let token = store.begin_annotation(&ranges, CoverageCategory::Media).unwrap();
    let row = ranges[0].to_highlight("h-ferry", CoverageCategory::Media);
    store.confirm_annotation(&token, vec![row]).unwrap();

    // Attach an upload and a reference, then close: the annotation stays
    store.select_highlight(Some("h-ferry"), Some(SidebarTab::Upload)).unwrap();
    store
        .add_media_file(MediaFile::new("f1", "p1", "ferry.mp4", "video/mp4"))
        .unwrap();
    store
        .add_file_reference(FileReference::new("r1", "p1", "ARCHIVE_0042.mov"))
        .unwrap();
    store
        .add_highlight_media(HighlightMedia::file("l1", "h-ferry", "f1"))
        .unwrap();
    store
        .add_highlight_media(HighlightMedia::reference("l2", "h-ferry", "r1"))
        .unwrap();
    let media = store.media_for_highlight("h-ferry");
    assert_eq!(media.uploaded[0].filename, "ferry.mp4");
    assert_eq!(media.references[0].filename, "ARCHIVE_0042.mov");
    assert_eq!(store.close_sidebar().unwrap(), None);

    // Dropping both files leaves a bare media annotation, pruned on close
    store.remove_media_file("f1").unwrap();
    store.remove_file_reference("r1").unwrap();
    store.select_highlight(Some("h-ferry"), None).unwrap();
    let pruned = store.close_sidebar().unwrap().unwrap();
    assert_eq!(pruned.id(), "h-ferry");
    assert!(store.highlight("h-ferry").is_none());
    assert_eq!(store.ui().sidebar_tab, SidebarTab::Media);
}

#[test]
fn overrides_color_rendered_spans() {
    let mut store = load();
    store
        .begin_annotation(
            &[scriptmark_editor::SectionRange::new("s1", 0, 5)],
            CoverageCategory::OnCamera,
        )
        .unwrap();

    let settings = scriptmark_core::ProjectSettings::from_json(r##"{"coverageColors":{"on_camera":"#ff8800"}}"##).unwrap();
    let palette = CoveragePalette::from_settings(&settings);
    let rows = store.section_highlight_rows("s1");
    let spans = compute_render_spans(&store.sections()[1].body, &rows);

    assert_eq!(palette.span_color(&spans[0].highlight_ids, &rows), "#ff8800");
    assert_eq!(palette.span_color(&spans[1].highlight_ids, &rows), "transparent");
}

#[test]
fn unknown_ids_are_reported() {
    let mut store = load();
    let err = store.select_highlight(Some("nope"), None).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        store.rollback_annotation("pending-99"),
        Err(EditorError::pending_not_found("pending-99"))
    );
}
