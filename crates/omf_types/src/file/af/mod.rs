//! `.AF` (HAR archive) file format support.
//!
//! An AF file describes one HAR (robot): its stats, movement speeds, sound
//! translation table, and up to 70 moves, each carrying its own animation and
//! sprites.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size  Field          Description
//! ------  ----  -------------  ------------------------------------------
//! 0x00    2     file_id        HAR identifier
//! 0x02    2     unknown_a      Unknown, preserved verbatim
//! 0x04    4     endurance      Endurance stat
//! 0x08    1     unknown_b      Unknown, preserved verbatim
//! 0x09    2     power          Power stat
//! 0x0B    4     forward_speed  Signed movement speeds
//! 0x0F    4     reverse_speed
//! 0x13    4     jump_speed
//! 0x17    4     fall_speed
//! 0x1B    1     unknown_c      Unknown, preserved verbatim
//! 0x1C    1     unknown_d      Unknown, preserved verbatim
//! 0x1D    30    sound_table    Sound translation table
//! 0x3B    ...   move slots     70 × (presence byte + optional move)
//! ```
//!
//! Each move slot starts with a presence byte: `0` for an empty slot, `1` if
//! a move record follows. Any other value is rejected as corrupt.
//!
//! # Examples
//!
//! ```no_run
//! use omf_types::file::af::{File, Move};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut har = File::open("FIGHTR0.AF")?;
//! println!("HAR {} has {} moves", har.file_id, har.move_count());
//!
//! if let Some(first) = har.get_move(0) {
//!     println!("Move 0 input: {}", first.move_string());
//! }
//!
//! har.set_move(69, Some(Move::default()))?;
//! har.save("FIGHTR0_EDITED.AF")?;
//! # Ok(())
//! # }
//! ```

use std::{
	fmt::Formatter,
	io::{Read, Write},
	path::Path,
};

use log::trace;

use crate::file::{FileError, FileType, Reader, Resource, Writer};

pub mod moves;


pub use moves::{Move, MoveSlots};

/// AF file constants.
pub mod constants {
	/// Number of move slots in an archive
	pub const MAX_MOVES: usize = 70;

	/// Size of the sound translation table in bytes
	pub const SOUND_TABLE_SIZE: usize = 30;

	/// Size of the fixed header fields in bytes
	pub const HEADER_SIZE: usize = 29;

	/// Size of the move parameter block
	pub const MOVE_UNKNOWN_SIZE: usize = 21;

	/// Size of the move input string buffer
	pub const MOVE_STRING_SIZE: usize = 21;

	/// Presence byte of an empty slot
	pub const SLOT_EMPTY: u8 = 0;

	/// Presence byte of an occupied slot
	pub const SLOT_PRESENT: u8 = 1;

	/// Size of an archive with no moves
	pub const EMPTY_FILE_SIZE: usize = HEADER_SIZE + SOUND_TABLE_SIZE + MAX_MOVES;
}

/// AF file, representing a complete HAR archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct File {
	/// HAR identifier
	pub file_id: u16,
	/// Unknown field
	pub unknown_a: u16,
	/// Endurance stat
	pub endurance: u32,
	/// Unknown field
	pub unknown_b: u8,
	/// Power stat
	pub power: u16,
	/// Forward walking speed
	pub forward_speed: i32,
	/// Backward walking speed
	pub reverse_speed: i32,
	/// Jump speed
	pub jump_speed: i32,
	/// Fall speed
	pub fall_speed: i32,
	/// Unknown field
	pub unknown_c: u8,
	/// Unknown field
	pub unknown_d: u8,
	/// Sound translation table
	pub sound_table: [u8; constants::SOUND_TABLE_SIZE],

	moves: MoveSlots,
}

impl File {
	/// Creates an empty archive: every field zeroed and every move slot empty.
	pub fn new() -> Self {
		Self {
			file_id: 0,
			unknown_a: 0,
			endurance: 0,
			unknown_b: 0,
			power: 0,
			forward_speed: 0,
			reverse_speed: 0,
			jump_speed: 0,
			fall_speed: 0,
			unknown_c: 0,
			unknown_d: 0,
			sound_table: [0; constants::SOUND_TABLE_SIZE],
			moves: MoveSlots::new(),
		}
	}

	/// Opens an AF file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file cannot be opened
	/// - The data is truncated, has a bad slot marker, or has trailing bytes
	/// - A move buffer cannot be allocated
	pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
		<Self as Resource>::load(path)
	}

	/// Parses an AF file from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, FileError> {
		<Self as Resource>::from_bytes(data)
	}

	/// Serializes the AF file to bytes.
	pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
		<Self as Resource>::to_bytes(self)
	}

	/// Saves the AF file to the specified path.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
		<Self as Resource>::save(self, path)
	}

	/// Returns the move at `index`.
	///
	/// Returns `None` for an empty slot and for any index outside `0..70`;
	/// "no move here" is a normal answer, not an error.
	pub fn get_move(&self, index: usize) -> Option<&Move> {
		self.moves.get(index)
	}

	/// Returns a mutable reference to the move at `index`.
	pub fn get_move_mut(&mut self, index: usize) -> Option<&mut Move> {
		self.moves.get_mut(index)
	}

	/// Installs (`Some`) or clears (`None`) the move at `index`.
	///
	/// The previous occupant is returned; dropping it frees it.
	///
	/// # Errors
	///
	/// Returns [`FileError::InvalidInput`] if `index` is not in `0..70`. No slot
	/// is modified in that case.
	pub fn set_move(
		&mut self,
		index: usize,
		value: Option<Move>,
	) -> Result<Option<Move>, FileError> {
		self.moves.set(index, value)
	}

	/// Removes the move at `index` and returns it.
	pub fn take_move(&mut self, index: usize) -> Option<Move> {
		self.moves.take(index)
	}

	/// Returns the move slot array.
	pub fn moves(&self) -> &MoveSlots {
		&self.moves
	}

	/// Returns the number of occupied move slots.
	pub fn move_count(&self) -> usize {
		self.moves.count()
	}

	/// Empties every move slot, keeping the header and sound table.
	pub fn clear_moves(&mut self) {
		self.moves.clear();
	}

	/// Resets the archive to the state produced by [`File::new`].
	pub fn clear(&mut self) {
		*self = Self::new();
	}
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl Resource for File {
	const FILE_TYPE: FileType = FileType::Af;

	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError> {
		let mut af = Self::new();

		af.file_id = reader.read_u16()?;
		af.unknown_a = reader.read_u16()?;
		af.endurance = reader.read_u32()?;
		af.unknown_b = reader.read_u8()?;
		af.power = reader.read_u16()?;
		af.forward_speed = reader.read_i32()?;
		af.reverse_speed = reader.read_i32()?;
		af.jump_speed = reader.read_i32()?;
		af.fall_speed = reader.read_i32()?;
		af.unknown_c = reader.read_u8()?;
		af.unknown_d = reader.read_u8()?;
		reader.read_buf(&mut af.sound_table)?;

		for index in 0..constants::MAX_MOVES {
			let marker_offset = reader.offset();
			match reader.read_u8()? {
				constants::SLOT_EMPTY => {}
				constants::SLOT_PRESENT => {
					let decoded = Move::decode(reader)?;
					trace!("Decoded move {} ending at offset {}", index, reader.offset());
					af.moves.set(index, Some(decoded))?;
				}
				other => {
					return Err(FileError::corrupt(
						FileType::Af,
						marker_offset,
						format!("invalid presence marker {:#04X} for move slot {}", other, index),
					));
				}
			}
		}

		Ok(af)
	}

	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError> {
		writer.write_u16(self.file_id)?;
		writer.write_u16(self.unknown_a)?;
		writer.write_u32(self.endurance)?;
		writer.write_u8(self.unknown_b)?;
		writer.write_u16(self.power)?;
		writer.write_i32(self.forward_speed)?;
		writer.write_i32(self.reverse_speed)?;
		writer.write_i32(self.jump_speed)?;
		writer.write_i32(self.fall_speed)?;
		writer.write_u8(self.unknown_c)?;
		writer.write_u8(self.unknown_d)?;
		writer.write_buf(&self.sound_table, constants::SOUND_TABLE_SIZE)?;

		for slot in self.moves.slots() {
			match slot {
				Some(m) => {
					writer.write_u8(constants::SLOT_PRESENT)?;
					m.encode(writer)?;
				}
				None => writer.write_u8(constants::SLOT_EMPTY)?,
			}
		}
		Ok(())
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "AF File: id {}", self.file_id)?;
		writeln!(f, "  Endurance: {}, Power: {}", self.endurance, self.power)?;
		writeln!(
			f,
			"  Speeds: forward {}, reverse {}, jump {}, fall {}",
			self.forward_speed, self.reverse_speed, self.jump_speed, self.fall_speed
		)?;
		write!(f, "  Moves: {} of {}", self.move_count(), constants::MAX_MOVES)
	}
}

impl TryFrom<&[u8]> for File {
	type Error = FileError;

	fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
		Self::from_bytes(value)
	}
}

impl TryFrom<Vec<u8>> for File {
	type Error = FileError;

	fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
		Self::from_bytes(&value)
	}
}

impl TryFrom<&File> for Vec<u8> {
	type Error = FileError;

	fn try_from(value: &File) -> Result<Self, Self::Error> {
		value.to_bytes()
	}
}
