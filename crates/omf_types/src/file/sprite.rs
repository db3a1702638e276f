//! Sprite records embedded in animations.
//!
//! # Layout
//!
//! ```text
//! Offset  Size  Field    Description
//! ------  ----  -------  ------------------------------------------
//! 0x00    2     len      Length of the encoded image data
//! 0x02    2     pos_x    Horizontal draw offset (signed)
//! 0x04    2     pos_y    Vertical draw offset (signed)
//! 0x06    2     width    Width in pixels
//! 0x08    2     height   Height in pixels
//! 0x0A    1     index    Sprite index within the animation
//! 0x0B    1     missing  Non-zero if the image data lives elsewhere
//! 0x0C    len   data     Encoded image data, only when missing == 0
//! ```
//!
//! A "missing" sprite reuses pixels from another animation of the same
//! archive; its `len` is kept so the record can be written back unchanged.

use std::io::{Read, Write};

use super::{FileError, FileType, Reader, Resource, Writer};

/// Size of the fixed sprite header in bytes
pub const HEADER_SIZE: usize = 12;

/// Where a sprite's image data lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpriteData {
	/// Encoded image data stored right after the header
	Inline(Vec<u8>),

	/// Data borrowed from another animation; only the length is stored
	Shared {
		/// Length recorded in the header
		len: u16,
		/// Raw non-zero `missing` byte
		marker: u8,
	},
}

impl SpriteData {
	/// Returns the length written to the `len` header field.
	pub fn len(&self) -> usize {
		match self {
			Self::Inline(data) => data.len(),
			Self::Shared {
				len,
				..
			} => usize::from(*len),
		}
	}

	/// Returns `true` if the recorded length is zero.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for SpriteData {
	fn default() -> Self {
		Self::Inline(Vec::new())
	}
}

/// A single sprite frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Sprite {
	/// Horizontal draw offset
	pub pos_x: i16,
	/// Vertical draw offset
	pub pos_y: i16,
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Sprite index
	pub index: u8,
	/// Image data
	pub data: SpriteData,
}

impl Sprite {
	/// Returns `true` if the image data lives in another animation.
	pub fn is_missing(&self) -> bool {
		matches!(self.data, SpriteData::Shared { .. })
	}

	/// Returns the inline image data, if any.
	pub fn inline_data(&self) -> Option<&[u8]> {
		match &self.data {
			SpriteData::Inline(data) => Some(data),
			SpriteData::Shared {
				..
			} => None,
		}
	}

	/// Returns the number of bytes this sprite occupies on disk.
	pub fn encoded_size(&self) -> usize {
		match &self.data {
			SpriteData::Inline(data) => HEADER_SIZE + data.len(),
			SpriteData::Shared {
				..
			} => HEADER_SIZE,
		}
	}
}

impl Resource for Sprite {
	const FILE_TYPE: FileType = FileType::Sprite;

	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError> {
		let len = reader.read_u16()?;
		let pos_x = reader.read_i16()?;
		let pos_y = reader.read_i16()?;
		let width = reader.read_u16()?;
		let height = reader.read_u16()?;
		let index = reader.read_u8()?;
		let missing = reader.read_u8()?;

		let data = if missing == 0 {
			SpriteData::Inline(reader.read_vec(usize::from(len))?)
		} else {
			SpriteData::Shared {
				len,
				marker: missing,
			}
		};

		Ok(Self {
			pos_x,
			pos_y,
			width,
			height,
			index,
			data,
		})
	}

	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError> {
		let len = u16::try_from(self.data.len()).map_err(|_| {
			FileError::invalid_input(
				FileType::Sprite,
				format!("sprite data of {} bytes exceeds {} bytes", self.data.len(), u16::MAX),
			)
		})?;
		let missing = match &self.data {
			SpriteData::Inline(_) => 0,
			SpriteData::Shared {
				marker: 0,
				..
			} => {
				return Err(FileError::invalid_input(
					FileType::Sprite,
					"shared sprite marker must be non-zero",
				));
			}
			SpriteData::Shared {
				marker,
				..
			} => *marker,
		};

		writer.write_u16(len)?;
		writer.write_i16(self.pos_x)?;
		writer.write_i16(self.pos_y)?;
		writer.write_u16(self.width)?;
		writer.write_u16(self.height)?;
		writer.write_u8(self.index)?;
		writer.write_u8(missing)?;
		if let SpriteData::Inline(data) = &self.data {
			writer.write_all(data)?;
		}
		Ok(())
	}
}
