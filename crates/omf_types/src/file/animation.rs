//! Animation records embedded in moves.
//!
//! # Layout
//!
//! ```text
//! Field            Size              Description
//! ---------------  ----------------  ------------------------------------------
//! start_x          2                 Start position (signed)
//! start_y          2                 Start position (signed)
//! unknown_a        4                 Unknown, preserved verbatim
//! coord_count      2                 Number of collision coordinates
//! frame_count      1                 Number of sprites
//! coords           4 × coord_count   Packed collision coordinates
//! anim_string      2 + n + 1         Length, bytes, trailing NUL
//! extra_count      1                 Number of extra strings
//! extra_strings    2 + n + 1 each    Same encoding as anim_string
//! sprites          variable          frame_count sprite records
//! ```
//!
//! # Collision coordinate packing
//!
//! ```text
//! bits  0..10  x         10-bit two's complement
//! bits 10..16  null      unknown, preserved
//! bits 16..26  y         10-bit two's complement
//! bits 26..32  frame_id  sprite the coordinate belongs to
//! ```

use std::io::{Read, Write};

use super::{FileError, FileType, Reader, Resource, Sprite, Writer};

/// Packing constants for collision coordinates.
pub mod constants {
	/// Mask for the 10-bit signed x/y fields
	pub const COORD_MASK: u32 = 0x3FF;

	/// Sign bit of the 10-bit x/y fields
	pub const COORD_SIGN_BIT: u32 = 0x200;

	/// Mask for the 6-bit `null` and `frame_id` fields
	pub const SIX_BIT_MASK: u32 = 0x3F;

	/// Smallest representable coordinate
	pub const COORD_MIN: i16 = -512;

	/// Largest representable coordinate
	pub const COORD_MAX: i16 = 511;
}

/// A collision point attached to one sprite of the animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CollisionCoord {
	/// Horizontal position, -512..=511
	pub x: i16,
	/// Unknown 6-bit field
	pub null: u8,
	/// Vertical position, -512..=511
	pub y: i16,
	/// Sprite index, 0..=63
	pub frame_id: u8,
}

fn sign_extend_10(value: u32) -> i16 {
	let value = (value & constants::COORD_MASK) as i16;
	if value & constants::COORD_SIGN_BIT as i16 != 0 {
		value - 0x400
	} else {
		value
	}
}

impl CollisionCoord {
	/// Unpacks a coordinate from its on-disk word.
	pub fn unpack(word: u32) -> Self {
		Self {
			x: sign_extend_10(word),
			null: ((word >> 10) & constants::SIX_BIT_MASK) as u8,
			y: sign_extend_10(word >> 16),
			frame_id: ((word >> 26) & constants::SIX_BIT_MASK) as u8,
		}
	}

	/// Packs the coordinate into its on-disk word.
	///
	/// Out-of-range values are truncated to their field width; use
	/// [`CollisionCoord::validate`] to reject them instead.
	pub fn pack(&self) -> u32 {
		(self.x as u32 & constants::COORD_MASK)
			| ((u32::from(self.null) & constants::SIX_BIT_MASK) << 10)
			| ((self.y as u32 & constants::COORD_MASK) << 16)
			| ((u32::from(self.frame_id) & constants::SIX_BIT_MASK) << 26)
	}

	/// Checks that every field fits its bit width.
	pub fn validate(&self) -> Result<(), FileError> {
		let in_range = |v: i16| (constants::COORD_MIN..=constants::COORD_MAX).contains(&v);
		if !in_range(self.x) || !in_range(self.y) {
			return Err(FileError::invalid_input(
				FileType::Animation,
				format!("collision coordinate ({}, {}) out of 10-bit range", self.x, self.y),
			));
		}
		if u32::from(self.null) > constants::SIX_BIT_MASK
			|| u32::from(self.frame_id) > constants::SIX_BIT_MASK
		{
			return Err(FileError::invalid_input(
				FileType::Animation,
				format!(
					"collision null {} / frame id {} exceed 6 bits",
					self.null, self.frame_id
				),
			));
		}
		Ok(())
	}
}

/// Animation with its collision data and sprite frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Animation {
	/// Start position x
	pub start_x: i16,
	/// Start position y
	pub start_y: i16,
	/// Unknown header field
	pub unknown_a: u32,
	/// Collision coordinates
	pub coords: Vec<CollisionCoord>,
	/// Animation script string, without the trailing NUL
	pub anim_string: Vec<u8>,
	/// Additional script strings, without trailing NULs
	pub extra_strings: Vec<Vec<u8>>,
	/// Sprite frames
	pub sprites: Vec<Sprite>,
}

impl Animation {
	/// Returns the animation string as text, replacing invalid bytes.
	pub fn anim_string_lossy(&self) -> String {
		String::from_utf8_lossy(&self.anim_string).into_owned()
	}

	/// Returns the collision coordinates belonging to the given sprite.
	pub fn coords_for_frame(&self, frame_id: u8) -> impl Iterator<Item = &CollisionCoord> {
		self.coords.iter().filter(move |c| c.frame_id == frame_id)
	}

	fn check_counts(&self) -> Result<(u16, u8, u8), FileError> {
		let too_many = |what: &str, count: usize, max: usize| {
			FileError::invalid_input(
				FileType::Animation,
				format!("{} {} exceeds maximum of {}", count, what, max),
			)
		};
		let coord_count = u16::try_from(self.coords.len())
			.map_err(|_| too_many("collision coordinates", self.coords.len(), u16::MAX.into()))?;
		let frame_count = u8::try_from(self.sprites.len())
			.map_err(|_| too_many("sprites", self.sprites.len(), u8::MAX.into()))?;
		let extra_count = u8::try_from(self.extra_strings.len())
			.map_err(|_| too_many("extra strings", self.extra_strings.len(), u8::MAX.into()))?;

		for s in std::iter::once(&self.anim_string).chain(&self.extra_strings) {
			if s.len() > usize::from(u16::MAX) {
				return Err(too_many("string bytes", s.len(), u16::MAX.into()));
			}
		}
		for coord in &self.coords {
			coord.validate()?;
		}
		Ok((coord_count, frame_count, extra_count))
	}
}

fn read_string<R: Read>(reader: &mut Reader<R>) -> Result<Vec<u8>, FileError> {
	let len = reader.read_u16()?;
	let data = reader.read_vec(usize::from(len))?;
	let terminator_offset = reader.offset();
	match reader.read_u8()? {
		0 => Ok(data),
		other => Err(FileError::corrupt(
			reader.file_type(),
			terminator_offset,
			format!("string terminator is {:#04X}, expected NUL", other),
		)),
	}
}

fn write_string<W: Write>(writer: &mut Writer<W>, data: &[u8]) -> Result<(), FileError> {
	writer.write_u16(data.len() as u16)?;
	writer.write_all(data)?;
	writer.write_u8(0)
}

impl Resource for Animation {
	const FILE_TYPE: FileType = FileType::Animation;

	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError> {
		let start_x = reader.read_i16()?;
		let start_y = reader.read_i16()?;
		let unknown_a = reader.read_u32()?;
		let coord_count = reader.read_u16()?;
		let frame_count = reader.read_u8()?;

		let mut coords = Vec::with_capacity(usize::from(coord_count));
		for _ in 0..coord_count {
			coords.push(CollisionCoord::unpack(reader.read_u32()?));
		}

		let anim_string = read_string(reader)?;

		let extra_count = reader.read_u8()?;
		let mut extra_strings = Vec::with_capacity(usize::from(extra_count));
		for _ in 0..extra_count {
			extra_strings.push(read_string(reader)?);
		}

		let mut sprites = Vec::with_capacity(usize::from(frame_count));
		for _ in 0..frame_count {
			sprites.push(Sprite::decode(reader)?);
		}

		Ok(Self {
			start_x,
			start_y,
			unknown_a,
			coords,
			anim_string,
			extra_strings,
			sprites,
		})
	}

	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError> {
		let (coord_count, frame_count, extra_count) = self.check_counts()?;

		writer.write_i16(self.start_x)?;
		writer.write_i16(self.start_y)?;
		writer.write_u32(self.unknown_a)?;
		writer.write_u16(coord_count)?;
		writer.write_u8(frame_count)?;

		for coord in &self.coords {
			writer.write_u32(coord.pack())?;
		}

		write_string(writer, &self.anim_string)?;

		writer.write_u8(extra_count)?;
		for extra in &self.extra_strings {
			write_string(writer, extra)?;
		}

		for sprite in &self.sprites {
			sprite.encode(writer)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::SpriteData;

	fn sample_animation() -> Animation {
		Animation {
			start_x: -20,
			start_y: 185,
			unknown_a: 0xCAFE_0001,
			coords: vec![
				CollisionCoord {
					x: -512,
					null: 0x3F,
					y: 511,
					frame_id: 0,
				},
				CollisionCoord {
					x: 17,
					null: 0,
					y: -3,
					frame_id: 1,
				},
			],
			anim_string: b"A1-B2-C3".to_vec(),
			extra_strings: vec![b"s4".to_vec(), Vec::new()],
			sprites: vec![
				Sprite {
					pos_x: 1,
					pos_y: 2,
					width: 2,
					height: 1,
					index: 0,
					data: SpriteData::Inline(vec![0xAA, 0xBB]),
				},
				Sprite {
					pos_x: -1,
					pos_y: -2,
					width: 8,
					height: 8,
					index: 1,
					data: SpriteData::Shared {
						len: 64,
						marker: 1,
					},
				},
			],
		}
	}

	#[test]
	fn test_coord_unpack_known_word() {
		// x = -1 (0x3FF), null = 0x15, y = 2, frame_id = 0x2A
		let word = 0x3FF | (0x15 << 10) | (0x002 << 16) | (0x2A << 26);
		let coord = CollisionCoord::unpack(word);
		assert_eq!(
			coord,
			CollisionCoord {
				x: -1,
				null: 0x15,
				y: 2,
				frame_id: 0x2A,
			}
		);
		assert_eq!(coord.pack(), word);
	}

	#[test]
	fn test_coord_pack_preserves_every_bit() {
		for word in [0u32, u32::MAX, 0x8000_0200, 0x0200_8000, 0xFC00_03FF, 0x03FF_FC00] {
			assert_eq!(CollisionCoord::unpack(word).pack(), word, "word {:08X}", word);
		}
	}

	#[test]
	fn test_coord_validate() {
		let ok = CollisionCoord {
			x: 511,
			null: 63,
			y: -512,
			frame_id: 63,
		};
		assert!(ok.validate().is_ok());

		let bad = CollisionCoord {
			x: 512,
			..ok
		};
		assert!(bad.validate().is_err());

		let bad = CollisionCoord {
			frame_id: 64,
			..ok
		};
		assert!(bad.validate().is_err());
	}

	#[test]
	fn test_round_trip() {
		let animation = sample_animation();
		let bytes = animation.to_bytes().unwrap();
		let decoded = Animation::from_bytes(&bytes).unwrap();
		assert_eq!(decoded, animation);
		assert_eq!(decoded.to_bytes().unwrap(), bytes);
	}

	#[test]
	fn test_encoded_layout_header() {
		let bytes = sample_animation().to_bytes().unwrap();
		assert_eq!(&bytes[0..2], &(-20i16).to_le_bytes());
		assert_eq!(&bytes[2..4], &185i16.to_le_bytes());
		assert_eq!(&bytes[4..8], &0xCAFE_0001u32.to_le_bytes());
		assert_eq!(&bytes[8..10], &2u16.to_le_bytes());
		assert_eq!(bytes[10], 2);

		// anim string starts after the two coordinate words
		let string_start = 11 + 2 * 4;
		assert_eq!(&bytes[string_start..string_start + 2], &8u16.to_le_bytes());
		assert_eq!(&bytes[string_start + 2..string_start + 10], b"A1-B2-C3");
		assert_eq!(bytes[string_start + 10], 0);
		assert_eq!(bytes[string_start + 11], 2);
	}

	#[test]
	fn test_coords_for_frame() {
		let animation = sample_animation();
		assert_eq!(animation.coords_for_frame(1).count(), 1);
		assert_eq!(animation.coords_for_frame(5).count(), 0);
		assert_eq!(animation.anim_string_lossy(), "A1-B2-C3");
	}

	#[test]
	fn test_truncated_sprite_table() {
		let mut bytes = sample_animation().to_bytes().unwrap();
		bytes.truncate(bytes.len() - 3);
		let err = Animation::from_bytes(&bytes).unwrap_err();
		assert!(err.is_parse_error());
	}

	#[test]
	fn test_non_nul_string_terminator_rejected() {
		let animation = Animation {
			anim_string: b"A1".to_vec(),
			..Animation::default()
		};
		let mut bytes = animation.to_bytes().unwrap();
		// header (11) + length (2) + "A1"
		let terminator = 11 + 2 + 2;
		assert_eq!(bytes[terminator], 0);
		bytes[terminator] = 0x7E;

		let err = Animation::from_bytes(&bytes).unwrap_err();
		assert!(matches!(
			err,
			FileError::Corrupt {
				file_type: FileType::Animation,
				offset: 15,
				..
			}
		));
	}

	#[test]
	fn test_invalid_coordinate_rejected_on_encode() {
		let mut animation = sample_animation();
		animation.coords[0].y = 600;
		assert!(matches!(animation.to_bytes(), Err(FileError::InvalidInput { .. })));
	}
}
