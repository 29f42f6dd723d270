//! Core types for the scriptmark editor layer
//!
//! - `EditorError` and the crate `Result` alias
//! - `SectionRange`, the unit selection mapping produces
//! - `SelectionRect` for toolbar placement

pub mod errors;
pub mod position;

pub use errors::{EditorError, Result};
pub use position::{SectionRange, SelectionRect};
