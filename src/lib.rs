#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `omf-rs` reads and writes the binary resource files of One Must Fall 2097.
//!
//! Every codec lives in [`omf_types`]; this crate re-exports it together with
//! a prelude:
//!
//! ```no_run
//! use omf_rs::prelude::*;
//!
//! let har = AfFile::open("FIGHTR0.AF").unwrap();
//! println!("{}", har);
//! ```
pub use omf_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use omf_dylib;
