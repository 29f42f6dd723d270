//! Utility functions and shared types for scriptmark core
//!
//! Contains the error types, hash map helpers and the UTF-16 offset
//! conversions shared by the parser and the annotation engine.
//!
//! # Example
//!
//! ```rust
//! use scriptmark_core::utils::{utf16_len, Utf16Index};
//!
//! let text = "café ☕";
//! assert_eq!(utf16_len(text), 6);
//! assert_eq!(Utf16Index::new(text).slice(0, 4), "café");
//! ```

pub mod errors;
pub mod hashers;
pub mod utf16;

pub use errors::{CoreError, ErrorCategory};
pub use hashers::{create_hash_map, create_hash_map_with_capacity, create_hash_set, FastMap, FastSet};
pub use utf16::{utf16_len, Utf16Index};
