//! Prelude module for `omf_types`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```no_run
//! use omf_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let har = AfFile::open("FIGHTR0.AF").unwrap();
//! let scores = ScoreFile::new();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// AF types
	AfFile,
	Animation,
	CollisionCoord,

	// Errors
	ErrorKind,
	FileError,
	FileType,

	Move,
	MoveSlots,

	// Streams and codec trait
	Reader,
	Resource,

	// Score types
	ScoreEntry,
	ScoreFile,

	Sprite,
	SpriteData,
	Writer,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
