//! Core error type for scriptmark operations

use core::fmt;
use thiserror::Error;

/// Main error type for scriptmark core operations
///
/// Wraps the failures of the fallible entry points (settings decoding,
/// explicit offset validation) behind one enum so callers can propagate
/// with `?`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Structural problem while reading script input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid project settings or palette overrides
    #[error("Configuration error: {0}")]
    Config(String),

    /// Highlight offsets that violate `0 <= start < end <= len`
    #[error("Invalid highlight offsets: start {start}, end {end} (text length: {length})")]
    InvalidOffset {
        start: usize,
        end: usize,
        length: usize,
    },

    /// Generic data validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal consistency error (should not happen)
    #[error("Internal error: {0} (this is a bug, please report)")]
    Internal(String),
}

impl CoreError {
    /// Create parse error from message
    pub fn parse<T: fmt::Display>(message: T) -> Self {
        Self::Parse(message.to_string())
    }

    /// Create configuration error from message
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::Config(message.to_string())
    }

    /// Create validation error from message
    pub fn validation<T: fmt::Display>(message: T) -> Self {
        Self::Validation(message.to_string())
    }

    /// Create serialization error from message
    pub fn serialization<T: fmt::Display>(message: T) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create internal error (indicates a bug)
    pub fn internal<T: fmt::Display>(message: T) -> Self {
        Self::Internal(message.to_string())
    }

    /// Create an offset error for a highlight range
    #[must_use]
    pub const fn invalid_offset(start: usize, end: usize, length: usize) -> Self {
        Self::InvalidOffset { start, end, length }
    }

    /// Check if error is recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Parse(_)
            | Self::Config(_)
            | Self::InvalidOffset { .. }
            | Self::Validation(_)
            | Self::Serialization(_) => true,
            Self::Internal(_) => false,
        }
    }

    /// Check if error indicates a bug in the library
    #[must_use]
    pub const fn is_internal_bug(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;
