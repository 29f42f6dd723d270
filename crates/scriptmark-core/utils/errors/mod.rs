//! Error types for scriptmark core utilities and cross-module error handling
//!
//! Provides the main `CoreError` enum shared by the parser, the annotation
//! engine and the settings layer, plus `ErrorCategory` for grouping.
//!
//! The three core algorithms never return errors for data-shape problems:
//! script parsing degrades to paragraphs and span resolution clamps stale
//! offsets. `CoreError` is reserved for the explicit validation and
//! configuration entry points around them.
//!
//! # Examples
//!
//! ```rust
//! use scriptmark_core::utils::errors::{CoreError, ErrorCategory};
//!
//! let err = CoreError::invalid_offset(12, 30, 20);
//! assert_eq!(err.category(), ErrorCategory::Validation);
//! assert!(err.is_recoverable());
//! ```

mod category;
mod core;

pub use category::ErrorCategory;
pub use self::core::{CoreError, Result};
