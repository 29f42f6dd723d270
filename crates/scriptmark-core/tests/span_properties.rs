//! Property-based tests for span resolution
//!
//! Uses proptest to check that `compute_render_spans` partitions any text
//! for any highlight set, including stale and inverted offsets.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use scriptmark_core::annotation::{compute_render_spans, Highlight, RenderSpan};
use scriptmark_core::utils::utf16_len;

/// Generate arbitrary section text
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 .,]{0,60}",
        // Accents, CJK and astral-plane characters
        "[a-zé漢🎬 ]{0,30}",
        Just(String::new()),
    ]
}

/// Generate highlights with offsets that may fall outside the text
fn arb_highlights() -> impl Strategy<Value = Vec<Highlight>> {
    prop::collection::vec((-10_i64..80, -10_i64..80), 0..8).prop_map(|ranges| {
        ranges
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| Highlight::new(format!("h{i}"), "s1", start, end))
            .collect()
    })
}

fn assert_partition(text: &str, spans: &[RenderSpan<'_>]) {
    let joined: String = spans.iter().map(|s| s.text).collect();
    assert_eq!(joined, text);
    for pair in spans.windows(2) {
        assert_eq!(pair[0].end_offset, pair[1].start_offset);
    }
    if let (Some(first), Some(last)) = (spans.first(), spans.last()) {
        assert_eq!(first.start_offset, 0);
        assert_eq!(last.end_offset, utf16_len(text));
    }
}

proptest! {
    /// Spans concatenate to the text and are contiguous
    #[test]
    fn spans_partition_text(text in arb_text(), highlights in arb_highlights()) {
        let spans = compute_render_spans(&text, &highlights);
        assert_partition(&text, &spans);
        prop_assert!(spans.iter().all(|s| s.start_offset < s.end_offset || text.is_empty()));
    }

    /// Same input, same output
    #[test]
    fn spans_are_idempotent(text in arb_text(), highlights in arb_highlights()) {
        let first = compute_render_spans(&text, &highlights);
        let second = compute_render_spans(&text, &highlights);
        prop_assert_eq!(first, second);
    }

    /// Every id listed on a span belongs to a highlight containing the span
    #[test]
    fn span_ids_are_covering_highlights(text in "[a-z ]{1,60}", highlights in arb_highlights()) {
        let spans = compute_render_spans(&text, &highlights);
        let len = i64::try_from(text.len()).unwrap();
        for span in &spans {
            let (a, b) = (
                i64::try_from(span.start_offset).unwrap(),
                i64::try_from(span.end_offset).unwrap(),
            );
            let expected: Vec<&str> = highlights
                .iter()
                .filter(|h| h.start_offset.clamp(0, len) <= a && h.end_offset.clamp(0, len) >= b)
                .map(|h| h.id.as_str())
                .collect();
            prop_assert_eq!(&span.highlight_ids, &expected);
        }
    }

    /// One in-range highlight yields prefix, highlight and suffix spans
    #[test]
    fn single_highlight_identity(text in "[a-z ]{1,60}", a in 0_usize..60, b in 0_usize..60) {
        let n = text.len();
        let (a, b) = (a.min(n), b.min(n));
        prop_assume!(a < b);

        let highlights = vec![Highlight::new(
            "only",
            "s1",
            i64::try_from(a).unwrap(),
            i64::try_from(b).unwrap(),
        )];
        let spans = compute_render_spans(&text, &highlights);

        let expected_len = 1 + usize::from(a > 0) + usize::from(b < n);
        prop_assert_eq!(spans.len(), expected_len);

        let marked: Vec<_> = spans.iter().filter(|s| s.is_highlighted()).collect();
        prop_assert_eq!(marked.len(), 1);
        prop_assert_eq!(marked[0].text, &text[a..b]);
        prop_assert_eq!(&marked[0].highlight_ids, &vec!["only"]);
        prop_assert_eq!((marked[0].start_offset, marked[0].end_offset), (a, b));
    }
}

#[test]
fn overlap_stacking_over_26_chars() {
    let text = "abcdefghijklmnopqrstuvwxyz";
    let highlights = vec![
        Highlight::new("A", "s1", 4, 15),
        Highlight::new("B", "s1", 10, 24),
    ];
    let spans = compute_render_spans(text, &highlights);
    let summary: Vec<_> = spans
        .iter()
        .map(|s| (s.start_offset, s.end_offset, s.highlight_ids.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (0, 4, vec![]),
            (4, 10, vec!["A"]),
            (10, 15, vec!["A", "B"]),
            (15, 24, vec!["B"]),
            (24, 26, vec![]),
        ]
    );
}

#[test]
fn hello_world_scenario() {
    let highlights = vec![Highlight::new("id1", "s1", 0, 5).with_category(
        scriptmark_core::CoverageCategory::Media,
    )];
    let spans = compute_render_spans("Hello world", &highlights);
    let summary: Vec<_> = spans
        .iter()
        .map(|s| (s.text, s.highlight_ids.clone()))
        .collect();
    assert_eq!(summary, vec![("Hello", vec!["id1"]), (" world", vec![])]);
}

#[test]
fn astral_characters_keep_utf16_offsets() {
    // Each clapperboard is two UTF-16 units
    let text = "🎬🎬 roll";
    let highlights = vec![Highlight::new("h", "s1", 2, 4)];
    let spans = compute_render_spans(text, &highlights);
    let summary: Vec<_> = spans
        .iter()
        .map(|s| (s.text, s.start_offset, s.end_offset))
        .collect();
    assert_eq!(summary, vec![("🎬", 0, 2), ("🎬", 2, 4), (" roll", 4, 9)]);
}
