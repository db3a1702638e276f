//! Prelude module for `omf_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use omf_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut har = AfFile::new();
//! har.set_move(3, Some(Move::default())).unwrap();
//! assert_eq!(har.move_count(), 1);
//!
//! let scores = ScoreFile::new();
//! assert!(scores.entry(0, 0).is_some_and(ScoreEntry::is_empty));
//! ```

// Re-export everything from omf_types::prelude
#[doc(inline)]
pub use omf_types::prelude::*;

// Re-export the entire omf_types module for advanced usage
#[doc(inline)]
pub use omf_types;
