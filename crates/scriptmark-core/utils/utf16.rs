//! UTF-16 offset utilities
//!
//! Highlight offsets are counted in UTF-16 code units, the unit browser
//! strings and most UI toolkits index by. Rust strings are UTF-8, so every
//! slice taken from a highlight offset goes through a `Utf16Index`.
//!
//! Offsets that land inside a surrogate pair are snapped down to the start
//! of that character. Offsets produced by selection mapping always fall on
//! character boundaries, so snapping only affects stale or hand-made input.

/// Count the UTF-16 code units of a string
///
/// # Example
///
/// ```rust
/// use scriptmark_core::utils::utf16_len;
///
/// assert_eq!(utf16_len("abc"), 3);
/// assert_eq!(utf16_len("🎬"), 2);
/// ```
#[must_use]
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Bidirectional map between UTF-16 offsets and byte offsets of one string
///
/// ASCII text needs no table: both units coincide.
#[derive(Debug, Clone)]
pub struct Utf16Index<'a> {
    text: &'a str,
    /// `(utf16_offset, byte_offset)` for every char start plus the end
    /// position; empty when the text is pure ASCII
    stops: Vec<(usize, usize)>,
    len_utf16: usize,
}

impl<'a> Utf16Index<'a> {
    /// Build the index for `text`
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        if text.is_ascii() {
            return Self {
                text,
                stops: Vec::new(),
                len_utf16: text.len(),
            };
        }

        let mut stops = Vec::with_capacity(text.len() + 1);
        let mut unit = 0;
        for (byte, ch) in text.char_indices() {
            stops.push((unit, byte));
            unit += ch.len_utf16();
        }
        stops.push((unit, text.len()));

        Self {
            text,
            stops,
            len_utf16: unit,
        }
    }

    /// The indexed text
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Length of the text in UTF-16 code units
    #[must_use]
    pub const fn len_utf16(&self) -> usize {
        self.len_utf16
    }

    /// Whether the text is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len_utf16 == 0
    }

    /// Clamp a signed offset into `[0, len]` and snap it to a char boundary
    ///
    /// Returns the snapped UTF-16 offset.
    #[must_use]
    pub fn clamp(&self, offset: i64) -> usize {
        let clamped = usize::try_from(offset.max(0)).map_or(self.len_utf16, |o| o.min(self.len_utf16));
        self.snap(clamped)
    }

    /// Snap an in-range UTF-16 offset down to the nearest char boundary
    #[must_use]
    pub fn snap(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_utf16);
        if self.stops.is_empty() {
            return offset;
        }
        match self.stops.binary_search_by_key(&offset, |&(unit, _)| unit) {
            Ok(_) => offset,
            Err(i) => self.stops[i.saturating_sub(1)].0,
        }
    }

    /// Byte offset of a UTF-16 offset (snapped down, clamped to the end)
    #[must_use]
    pub fn byte_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_utf16);
        if self.stops.is_empty() {
            return offset;
        }
        match self.stops.binary_search_by_key(&offset, |&(unit, _)| unit) {
            Ok(i) => self.stops[i].1,
            Err(i) => self.stops[i.saturating_sub(1)].1,
        }
    }

    /// UTF-16 offset of a byte offset
    ///
    /// Byte offsets inside a multi-byte character resolve to that
    /// character's start.
    #[must_use]
    pub fn utf16_offset(&self, byte: usize) -> usize {
        let byte = byte.min(self.text.len());
        if self.stops.is_empty() {
            return byte;
        }
        match self.stops.binary_search_by_key(&byte, |&(_, b)| b) {
            Ok(i) => self.stops[i].0,
            Err(i) => self.stops[i.saturating_sub(1)].0,
        }
    }

    /// Slice the text between two UTF-16 offsets
    ///
    /// Both ends are snapped and clamped, an inverted pair yields `""`.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let start = self.byte_offset(start);
        let end = self.byte_offset(end);
        if start >= end {
            return "";
        }
        &self.text[start..end]
    }
}
