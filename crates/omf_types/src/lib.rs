//! This crate provides the resource codecs for the `omf-rs` project.
//!
//! # File Formats
//!
//! - **AF**: HAR archives holding stats, a sound table and up to 70 moves
//! - **Move / Animation / Sprite**: records nested inside an AF archive
//! - **Score**: the `SCORES.DAT` high score table
//!
//! Every format implements [`file::Resource`], which provides loading,
//! saving and in-memory conversion on top of a per-format decoder and
//! encoder.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use omf_types::prelude::*;
//!
//! let mut har = AfFile::new();
//! har.file_id = 8;
//! har.set_move(0, Some(Move::default())).unwrap();
//!
//! let scores = ScoreFile::new();
//! assert_eq!(scores.iter().count(), 80);
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use omf_types::file::af::File;
//!
//! let har = File::open("FIGHTR0.AF").unwrap();
//! // ...
//! ```

pub mod file;

/// `use omf_types::prelude::*;` to import commonly used items.
pub mod prelude;
