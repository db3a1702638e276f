//! HAR move records and the fixed-capacity slot array that owns them.

use std::io::{Read, Write};

use crate::file::{Animation, FileError, FileType, Reader, Resource, Writer};

use super::constants;

/// A single HAR move: its animation plus the move parameters.
///
/// # Layout
///
/// ```text
/// Field          Size       Description
/// -------------  ---------  ------------------------------------------
/// animation      variable   Embedded animation record
/// unknown        21         Move parameter block, preserved verbatim
/// move_string    21         NUL padded input sequence
/// footer_len     2          Length of the footer string
/// footer_string  footer_len Free-form footer string
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Move {
	/// Animation played by the move
	pub animation: Animation,

	/// Move parameter block
	pub unknown: [u8; constants::MOVE_UNKNOWN_SIZE],

	/// Raw input sequence
	move_string: [u8; constants::MOVE_STRING_SIZE],

	/// Raw footer string
	footer_string: Vec<u8>,
}

impl Move {
	/// Creates a move around the given animation with empty strings.
	pub fn new(animation: Animation) -> Self {
		Self {
			animation,
			..Self::default()
		}
	}

	/// Returns the raw input sequence buffer.
	pub fn raw_move_string(&self) -> &[u8; constants::MOVE_STRING_SIZE] {
		&self.move_string
	}

	/// Returns the input sequence up to the first NUL.
	pub fn move_string(&self) -> String {
		let end = self.move_string.iter().position(|&b| b == 0).unwrap_or(self.move_string.len());
		String::from_utf8_lossy(&self.move_string[..end]).into_owned()
	}

	/// Sets the input sequence.
	///
	/// # Errors
	///
	/// The sequence must be ASCII and leave room for a terminating NUL.
	pub fn set_move_string(&mut self, value: &str) -> Result<(), FileError> {
		if !value.is_ascii() || value.len() >= constants::MOVE_STRING_SIZE {
			return Err(FileError::invalid_input(
				FileType::Move,
				format!(
					"move string must be ASCII and at most {} characters",
					constants::MOVE_STRING_SIZE - 1
				),
			));
		}
		self.move_string.fill(0);
		self.move_string[..value.len()].copy_from_slice(value.as_bytes());
		Ok(())
	}

	/// Returns the raw footer string.
	pub fn footer_string(&self) -> &[u8] {
		&self.footer_string
	}

	/// Replaces the footer string.
	///
	/// # Errors
	///
	/// The footer length is stored as a `u16`.
	pub fn set_footer_string(&mut self, value: impl Into<Vec<u8>>) -> Result<(), FileError> {
		let value = value.into();
		if value.len() > usize::from(u16::MAX) {
			return Err(FileError::invalid_input(
				FileType::Move,
				format!("footer string of {} bytes is too long", value.len()),
			));
		}
		self.footer_string = value;
		Ok(())
	}
}

impl Resource for Move {
	const FILE_TYPE: FileType = FileType::Move;

	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError> {
		let animation = Animation::decode(reader)?;
		let unknown = reader.read_array()?;
		let move_string = reader.read_array()?;
		let footer_len = reader.read_u16()?;
		let footer_string = reader.read_vec(usize::from(footer_len))?;

		Ok(Self {
			animation,
			unknown,
			move_string,
			footer_string,
		})
	}

	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError> {
		let footer_len = u16::try_from(self.footer_string.len()).map_err(|_| {
			FileError::invalid_input(FileType::Move, "footer string longer than 65535 bytes")
		})?;

		self.animation.encode(writer)?;
		writer.write_all(&self.unknown)?;
		writer.write_all(&self.move_string)?;
		writer.write_u16(footer_len)?;
		writer.write_all(&self.footer_string)
	}
}

/// Fixed array of [`constants::MAX_MOVES`] optional, independently owned moves.
///
/// Indexing is bounds-checked by construction: lookups outside the array
/// return `None` and writes return an invalid-input error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveSlots {
	slots: [Option<Move>; constants::MAX_MOVES],
}

impl MoveSlots {
	/// Creates an array with every slot empty.
	pub fn new() -> Self {
		Self {
			slots: std::array::from_fn(|_| None),
		}
	}

	/// Returns the move at `index`, or `None` if the slot is empty or out of range.
	pub fn get(&self, index: usize) -> Option<&Move> {
		self.slots.get(index).and_then(Option::as_ref)
	}

	/// Mutable variant of [`MoveSlots::get`].
	pub fn get_mut(&mut self, index: usize) -> Option<&mut Move> {
		self.slots.get_mut(index).and_then(Option::as_mut)
	}

	/// Installs or clears the move at `index`, returning the previous occupant.
	///
	/// # Errors
	///
	/// Returns an invalid-input error, without touching any slot, if `index`
	/// is out of range.
	pub fn set(&mut self, index: usize, value: Option<Move>) -> Result<Option<Move>, FileError> {
		let slot = self.slots.get_mut(index).ok_or_else(|| {
			FileError::invalid_input(
				FileType::Af,
				format!("move index {} out of range (max {})", index, constants::MAX_MOVES - 1),
			)
		})?;
		Ok(std::mem::replace(slot, value))
	}

	/// Removes and returns the move at `index`.
	pub fn take(&mut self, index: usize) -> Option<Move> {
		self.slots.get_mut(index).and_then(Option::take)
	}

	/// Returns the number of occupied slots.
	pub fn count(&self) -> usize {
		self.slots.iter().filter(|slot| slot.is_some()).count()
	}

	/// Iterates over occupied slots as `(index, move)` pairs.
	pub fn iter(&self) -> impl Iterator<Item = (usize, &Move)> {
		self.slots.iter().enumerate().filter_map(|(i, slot)| slot.as_ref().map(|m| (i, m)))
	}

	/// Iterates over every slot, occupied or not.
	pub fn slots(&self) -> &[Option<Move>; constants::MAX_MOVES] {
		&self.slots
	}

	/// Empties every slot.
	pub fn clear(&mut self) {
		self.slots.iter_mut().for_each(|slot| *slot = None);
	}
}

impl Default for MoveSlots {
	fn default() -> Self {
		Self::new()
	}
}
