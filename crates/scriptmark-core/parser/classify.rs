//! First-line classification heuristics
//!
//! Patterns are tried in priority order: act, scene (numbered or slug
//! line), then the all-caps heading rule. Anything else is body text.

use super::ast::SectionType;
use crate::utils::utf16_len;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length (exclusive, UTF-16 units) of an all-caps heading
pub const MAX_HEADING_LEN: usize = 80;

static ACT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^ACT\s+[A-Z0-9_]+").expect("act pattern is valid"));

static SCENE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:SCENE|SC\.?)\s+[A-Z0-9_]+").expect("scene pattern is valid")
});

static INT_EXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:INT|EXT|INT\./EXT)\.").expect("slug pattern is valid"));

// First char A-Z, then at least four of A-Z, whitespace, digits, `:,'-`
static ALL_CAPS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z\s0-9:,'\-]{4,}$").expect("heading pattern is valid")
});

/// Classify a single line
///
/// Returns `None` for ordinary body text. The line is trimmed first.
///
/// # Examples
///
/// ```rust
/// use scriptmark_core::parser::{classify_line, SectionType};
///
/// assert_eq!(classify_line("Act II"), Some(SectionType::Act));
/// assert_eq!(classify_line("SC. 4"), Some(SectionType::Scene));
/// assert_eq!(classify_line("EXT. HARBOUR - NIGHT"), Some(SectionType::Scene));
/// assert_eq!(classify_line("COLD OPEN"), Some(SectionType::Heading));
/// assert_eq!(classify_line("John enters."), None);
/// ```
#[must_use]
pub fn classify_line(line: &str) -> Option<SectionType> {
    let trimmed = line.trim();

    if ACT_PATTERN.is_match(trimmed) {
        return Some(SectionType::Act);
    }

    if SCENE_PATTERN.is_match(trimmed) || INT_EXT_PATTERN.is_match(trimmed) {
        return Some(SectionType::Scene);
    }

    if ALL_CAPS_HEADING.is_match(trimmed) && utf16_len(trimmed) < MAX_HEADING_LEN {
        return Some(SectionType::Heading);
    }

    None
}
