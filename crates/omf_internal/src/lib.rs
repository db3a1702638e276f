//! This module is separated into its own crate to enable simple dynamic linking for `omf_rs`,
//! and should not be used directly.

/// `use omf_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export omf_types for convenience
pub use omf_types;

// Re-export commonly used types at crate root
pub use omf_types::file::{AfFile, FileError, FileType, Resource, ScoreFile};
