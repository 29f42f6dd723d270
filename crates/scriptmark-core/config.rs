//! Per-project settings
//!
//! Projects store a free-form JSON settings object. The only key this crate
//! interprets is `coverageColors`, the per-category color override map;
//! every other key is carried through untouched so a decode/encode cycle
//! never loses data written by other clients.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_core::annotation::{CoverageCategory, CoveragePalette};
//! use scriptmark_core::config::ProjectSettings;
//!
//! let settings = ProjectSettings::from_json(
//!     r#"{"coverageColors": {"graphics": "oklch(0.8 0.1 150 / 30%)"}, "theme": "dark"}"#,
//! )?;
//! let palette = CoveragePalette::from_settings(&settings);
//!
//! assert_eq!(palette.color(CoverageCategory::Graphics), "oklch(0.8 0.1 150 / 30%)");
//! assert_eq!(palette.color(CoverageCategory::Media), "var(--highlight-blue)");
//! # Ok::<(), scriptmark_core::CoreError>(())
//! ```

use crate::annotation::{CoverageCategory, CoveragePalette};
use crate::utils::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Color override map stored under `coverageColors`
///
/// `field_footage` has no override key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_camera: Option<String>,
}

impl CoverageColors {
    /// Override for one category, if any
    #[must_use]
    pub fn get(&self, category: CoverageCategory) -> Option<&str> {
        match category {
            CoverageCategory::Media => self.media.as_deref(),
            CoverageCategory::Graphics => self.graphics.as_deref(),
            CoverageCategory::OnCamera => self.on_camera.as_deref(),
            CoverageCategory::FieldFootage => None,
        }
    }

    /// Whether no override is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.media.is_none() && self.graphics.is_none() && self.on_camera.is_none()
    }
}

/// Project settings object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(
        rename = "coverageColors",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub coverage_colors: Option<CoverageColors>,

    /// Keys this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectSettings {
    /// Decode a settings object from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the text is not a JSON object
    /// or `coverageColors` has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a settings object from an already parsed JSON value
    ///
    /// A `null` value is treated as empty settings.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the value has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Encode as a JSON value
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if encoding fails.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Apply a settings update
    ///
    /// Top-level keys present in `patch` replace the stored ones; nested
    /// objects are not merged, so a patch carrying `coverageColors` replaces
    /// the whole override map.
    pub fn merge(&mut self, patch: Self) {
        if patch.coverage_colors.is_some() {
            self.coverage_colors = patch.coverage_colors;
        }
        self.extra.extend(patch.extra);
    }

    /// Reject override values that are blank
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] naming the first blank override.
    pub fn validate(&self) -> Result<(), CoreError> {
        let Some(colors) = &self.coverage_colors else {
            return Ok(());
        };
        for category in CoverageCategory::ALL {
            if colors.get(category).is_some_and(|c| c.trim().is_empty()) {
                return Err(CoreError::config(format!(
                    "Coverage color for '{category}' is blank"
                )));
            }
        }
        Ok(())
    }
}

impl CoveragePalette {
    /// Palette with a project's color overrides applied
    #[must_use]
    pub fn from_settings(settings: &ProjectSettings) -> Self {
        let mut palette = Self::new();
        if let Some(colors) = &settings.coverage_colors {
            for category in CoverageCategory::ALL {
                palette.set_override(category, colors.get(category).map(str::to_string));
            }
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unknown_keys_round_trip() {
        let value = json!({
            "coverageColors": {"media": "#ff0000"},
            "theme": "dark",
            "zoom": 1.25
        });
        let settings = ProjectSettings::from_value(value.clone()).unwrap();
        assert_eq!(settings.extra.len(), 2);
        assert_eq!(settings.to_value().unwrap(), value);
    }

    #[test]
    fn null_and_empty_settings() {
        assert_eq!(
            ProjectSettings::from_value(Value::Null).unwrap(),
            ProjectSettings::default()
        );
        let settings = ProjectSettings::from_json("{}").unwrap();
        assert!(settings.coverage_colors.is_none());
        assert_eq!(CoveragePalette::from_settings(&settings), CoveragePalette::new());
    }

    #[test]
    fn wrong_shape_is_a_serialization_error() {
        let err = ProjectSettings::from_json(r#"{"coverageColors": 3}"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialization(_)));
        assert!(ProjectSettings::from_json("[1, 2]").is_err());
    }

    #[test]
    fn merge_is_shallow() {
        let mut settings = ProjectSettings::from_value(json!({
            "coverageColors": {"media": "#111111", "graphics": "#222222"},
            "theme": "dark"
        }))
        .unwrap();
        let patch = ProjectSettings::from_value(json!({
            "coverageColors": {"on_camera": "#333333"},
            "theme": "light"
        }))
        .unwrap();

        settings.merge(patch);

        let colors = settings.coverage_colors.clone().unwrap();
        assert_eq!(colors.media, None);
        assert_eq!(colors.on_camera.as_deref(), Some("#333333"));
        assert_eq!(settings.extra["theme"], json!("light"));
    }

    #[test]
    fn merge_without_colors_keeps_existing() {
        let mut settings = ProjectSettings::from_json(r##"{"coverageColors": {"media": "#1"}}"##).unwrap();
        settings.merge(ProjectSettings::from_json(r#"{"theme": "dark"}"#).unwrap());
        assert_eq!(
            settings.coverage_colors.and_then(|c| c.media).as_deref(),
            Some("#1")
        );
    }

    #[test]
    fn blank_override_fails_validation() {
        let settings = ProjectSettings::from_json(r#"{"coverageColors": {"graphics": "  "}}"#).unwrap();
        let err = settings.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Coverage color for 'graphics' is blank");
        assert_eq!(
            CoveragePalette::from_settings(&settings).color(CoverageCategory::Graphics),
            "var(--highlight-green)"
        );
    }
}
