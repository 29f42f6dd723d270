//! Error categorization for filtering and grouping

use super::CoreError;
use core::fmt;

/// Error category for filtering and user interface organization
///
/// # Examples
///
/// ```rust
/// use scriptmark_core::utils::errors::{CoreError, ErrorCategory};
///
/// let error = CoreError::parse("unterminated block");
/// assert_eq!(error.category(), ErrorCategory::Parsing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Problems understanding script input
    Parsing,
    /// Bad value formats (JSON, colors)
    Format,
    /// Settings and palette problems
    Configuration,
    /// Range and reference validation
    Validation,
    /// Library bugs
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parsing => "parsing",
            Self::Format => "format",
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Internal => "internal",
        })
    }
}

impl ErrorCategory {
    /// Check if errors in this category are typically user-fixable
    #[must_use]
    pub const fn is_user_fixable(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl CoreError {
    /// Get error category for filtering/grouping
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse(_) => ErrorCategory::Parsing,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::InvalidOffset { .. } | Self::Validation(_) => ErrorCategory::Validation,
            Self::Serialization(_) => ErrorCategory::Format,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}
