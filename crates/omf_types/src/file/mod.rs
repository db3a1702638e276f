//! File type support for the `omf-rs` project.

mod error;
mod reader;
mod resource;
mod writer;

pub mod af;
pub mod animation;
pub mod score;
pub mod sprite;

// Re-export unified error type
pub use error::{ErrorKind, FileError, FileType};

// Re-export byte streams and the codec trait
pub use reader::Reader;
pub use resource::Resource;
pub use writer::Writer;

// Re-export main file types
pub use af::{File as AfFile, Move, MoveSlots};
pub use animation::{Animation, CollisionCoord};
pub use score::{File as ScoreFile, ScoreEntry};
pub use sprite::{Sprite, SpriteData};
