//! Coverage categories and display colors
//!
//! The category set is closed. Each category has a fixed label and a
//! default color expressed as a CSS custom property; a project can override
//! the media, graphics and on-camera colors through its settings.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Color used for spans without any highlight
pub const TRANSPARENT: &str = "transparent";

/// Rotation of colors handed out to collaborators
pub const COLLABORATOR_COLORS: [&str; 5] = [
    "var(--highlight-blue)",
    "var(--highlight-amber)",
    "var(--highlight-green)",
    "var(--highlight-purple)",
    "var(--highlight-rose)",
];

/// Background variable to line-accent variable
const LINE_VARIANTS: [(&str, &str); 5] = [
    ("var(--highlight-blue)", "var(--highlight-blue-line)"),
    ("var(--highlight-green)", "var(--highlight-green-line)"),
    ("var(--highlight-amber)", "var(--highlight-amber-line)"),
    ("var(--highlight-purple)", "var(--highlight-purple-line)"),
    ("var(--highlight-rose)", "var(--highlight-rose-line)"),
];

static ALPHA_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*[0-9.]+%?\s*\)").expect("alpha pattern is valid"));

/// Purpose of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CoverageCategory {
    /// Archive or stock media needed for this passage
    #[default]
    Media,
    /// On-screen graphics
    Graphics,
    /// Presenter on camera
    OnCamera,
    /// Footage shot in the field (reserved)
    FieldFootage,
}

impl CoverageCategory {
    /// Every category in display order
    pub const ALL: [Self; 4] = [Self::Media, Self::Graphics, Self::OnCamera, Self::FieldFootage];

    /// Stored label value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Graphics => "graphics",
            Self::OnCamera => "on_camera",
            Self::FieldFootage => "field_footage",
        }
    }

    /// Parse a stored label value
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "media" => Some(Self::Media),
            "graphics" => Some(Self::Graphics),
            "on_camera" => Some(Self::OnCamera),
            "field_footage" => Some(Self::FieldFootage),
            _ => None,
        }
    }

    /// Category of a highlight label
    ///
    /// Missing or unknown labels fall back to media, which is what legacy
    /// highlights created before categories existed mean.
    ///
    /// ```rust
    /// use scriptmark_core::annotation::CoverageCategory;
    ///
    /// assert_eq!(CoverageCategory::from_label(Some("graphics")), CoverageCategory::Graphics);
    /// assert_eq!(CoverageCategory::from_label(Some("b-roll")), CoverageCategory::Media);
    /// assert_eq!(CoverageCategory::from_label(None), CoverageCategory::Media);
    /// ```
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        label.and_then(Self::parse).unwrap_or_default()
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Graphics => "Graphics",
            Self::OnCamera => "On Camera",
            Self::FieldFootage => "Field Footage",
        }
    }

    /// Built-in display color
    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            Self::Media => "var(--highlight-blue)",
            Self::Graphics => "var(--highlight-green)",
            Self::OnCamera => "var(--highlight-amber)",
            Self::FieldFootage => "var(--highlight-purple)",
        }
    }

    /// Whether annotations of this category need attached media to be kept
    #[must_use]
    pub const fn requires_media(self) -> bool {
        matches!(self, Self::Media)
    }

    const fn index(self) -> usize {
        match self {
            Self::Media => 0,
            Self::Graphics => 1,
            Self::OnCamera => 2,
            Self::FieldFootage => 3,
        }
    }
}

impl core::fmt::Display for CoverageCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category colors with per-project overrides applied
///
/// Overriding a category also re-colors explicit highlight colors that name
/// that category's built-in variable, the same way redefining the CSS
/// variable would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoveragePalette {
    overrides: [Option<String>; 4],
}

impl CoveragePalette {
    /// Palette with the built-in colors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one category's color
    #[must_use]
    pub fn with_override(mut self, category: CoverageCategory, color: impl Into<String>) -> Self {
        self.set_override(category, Some(color.into()));
        self
    }

    /// Set or clear one category's override
    pub fn set_override(&mut self, category: CoverageCategory, color: Option<String>) {
        self.overrides[category.index()] = color.filter(|c| !c.trim().is_empty());
    }

    /// Whether any override is set
    #[must_use]
    pub fn has_overrides(&self) -> bool {
        self.overrides.iter().any(Option::is_some)
    }

    /// Display color of a category
    #[must_use]
    pub fn color(&self, category: CoverageCategory) -> &str {
        self.overrides[category.index()]
            .as_deref()
            .unwrap_or_else(|| category.default_color())
    }

    /// Resolve an explicit color through the overrides
    ///
    /// Built-in category variables map to their override, anything else is
    /// returned unchanged.
    #[must_use]
    pub fn resolve<'a>(&'a self, color: &'a str) -> &'a str {
        CoverageCategory::ALL
            .iter()
            .find(|c| c.default_color() == color)
            .map_or(color, |&c| self.color(c))
    }

    /// Legend entries: category, label and effective color
    pub fn legend(&self) -> impl Iterator<Item = (CoverageCategory, &'static str, &str)> + '_ {
        CoverageCategory::ALL
            .into_iter()
            .map(move |c| (c, c.label(), self.color(c)))
    }
}

/// Convert a highlight background color to its line-accent variant
///
/// Known palette variables map to their `-line` variable; an `oklch()` or
/// similar color with an alpha component gets its alpha raised to 55%.
///
/// ```rust
/// use scriptmark_core::annotation::to_line_color;
///
/// assert_eq!(to_line_color("var(--highlight-green)"), "var(--highlight-green-line)");
/// assert_eq!(to_line_color("oklch(0.8 0.1 250 / 20%)"), "oklch(0.8 0.1 250 / 55%)");
/// assert_eq!(to_line_color("#ff0000"), "#ff0000");
/// ```
#[must_use]
pub fn to_line_color(background: &str) -> Cow<'_, str> {
    if let Some((_, line)) = LINE_VARIANTS.iter().find(|(bg, _)| *bg == background) {
        return Cow::Borrowed(*line);
    }
    ALPHA_SUFFIX.replace(background, "/ 55%)")
}

/// Color assigned to the collaborator at `index`, wrapping around
#[must_use]
pub const fn collaborator_color(index: usize) -> &'static str {
    COLLABORATOR_COLORS[index % COLLABORATOR_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_defaults() {
        assert_eq!(CoverageCategory::OnCamera.label(), "On Camera");
        assert_eq!(CoverageCategory::OnCamera.as_str(), "on_camera");
        assert_eq!(
            CoverageCategory::FieldFootage.default_color(),
            "var(--highlight-purple)"
        );
        for c in CoverageCategory::ALL {
            assert_eq!(CoverageCategory::parse(c.as_str()), Some(c));
        }
    }

    #[test]
    fn overrides_replace_category_colors() {
        let palette = CoveragePalette::new().with_override(CoverageCategory::Graphics, "#00ff00");
        assert_eq!(palette.color(CoverageCategory::Graphics), "#00ff00");
        assert_eq!(palette.color(CoverageCategory::Media), "var(--highlight-blue)");
        assert_eq!(palette.resolve("var(--highlight-green)"), "#00ff00");
        assert_eq!(palette.resolve("var(--highlight-rose)"), "var(--highlight-rose)");
        assert!(palette.has_overrides());
    }

    #[test]
    fn blank_override_is_ignored() {
        let palette = CoveragePalette::new().with_override(CoverageCategory::Media, "  ");
        assert!(!palette.has_overrides());
        assert_eq!(palette.color(CoverageCategory::Media), "var(--highlight-blue)");
    }

    #[test]
    fn legend_lists_all_categories() {
        let palette = CoveragePalette::new();
        let legend: Vec<_> = palette.legend().map(|(_, label, _)| label).collect();
        assert_eq!(legend, ["Media", "Graphics", "On Camera", "Field Footage"]);
    }

    #[test]
    fn collaborator_colors_wrap() {
        assert_eq!(collaborator_color(0), "var(--highlight-blue)");
        assert_eq!(collaborator_color(5), "var(--highlight-blue)");
        assert_eq!(collaborator_color(7), "var(--highlight-green)");
    }

    #[test]
    fn line_color_of_alpha_without_percent() {
        assert_eq!(
            to_line_color("oklch(0.7 0.2 30 / 0.25)"),
            "oklch(0.7 0.2 30 / 55%)"
        );
    }
}
