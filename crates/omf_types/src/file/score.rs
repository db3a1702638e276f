//! `SCORES.DAT` high score table support.
//!
//! The table is a fixed grid of 4 pages (one per difficulty) with 20 entries
//! each, stored row-major with no header.
//!
//! # Entry Layout
//!
//! ```text
//! Offset  Size  Field  Description
//! ------  ----  -----  ------------------------------------------
//! 0x00    4     score  Score value
//! 0x04    16    name   NUL padded player name
//! 0x14    4     id     Packed HAR id, pilot id and padding
//! ```
//!
//! The `id` word packs three fields:
//!
//! ```text
//! bits  0..6   har_id
//! bits  6..12  pilot_id
//! bits 12..32  padding (unknown, preserved)
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use omf_types::file::score::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scores = File::open("SCORES.DAT")?;
//! let top = scores.entry_mut(0, 0).ok_or("no such entry")?;
//! top.score = 999_999;
//! top.set_name("CRYSTAL")?;
//! scores.save("SCORES.DAT")?;
//! # Ok(())
//! # }
//! ```

use std::{
	fmt::Formatter,
	io::{Read, Write},
	path::Path,
};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::file::{FileError, FileType, Reader, Resource, Writer};

/// Score table constants.
pub mod constants {
	/// Number of pages
	pub const PAGES: usize = 4;

	/// Entries per page
	pub const ENTRIES_PER_PAGE: usize = 20;

	/// Size of the name buffer
	pub const NAME_SIZE: usize = 16;

	/// Size of one encoded entry
	pub const ENTRY_SIZE: usize = 4 + NAME_SIZE + 4;

	/// Size of the complete file
	pub const FILE_SIZE: usize = PAGES * ENTRIES_PER_PAGE * ENTRY_SIZE;

	/// Mask of the 6-bit HAR and pilot ids
	pub const ID_MASK: u32 = 0x3F;

	/// Mask of the 20-bit padding field
	pub const PADDING_MASK: u32 = 0xF_FFFF;

	/// Bit offset of the pilot id
	pub const PILOT_SHIFT: u32 = 6;

	/// Bit offset of the padding field
	pub const PADDING_SHIFT: u32 = 12;
}

/// One high score entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
	/// Score value
	pub score: u32,
	name: [u8; constants::NAME_SIZE],
	har_id: u8,
	pilot_id: u8,
	padding: u32,
}

impl ScoreEntry {
	/// Creates an entry from its unpacked fields. Ids and padding are masked
	/// to their bit widths.
	pub fn new(
		score: u32,
		name: [u8; constants::NAME_SIZE],
		har_id: u8,
		pilot_id: u8,
		padding: u32,
	) -> Self {
		let mut entry = Self {
			score,
			name,
			..Self::default()
		};
		entry.set_har_id(har_id);
		entry.set_pilot_id(pilot_id);
		entry.set_padding(padding);
		entry
	}

	/// Returns the name up to the first NUL.
	pub fn name(&self) -> String {
		let end = self.name.iter().position(|&b| b == 0).unwrap_or(self.name.len());
		String::from_utf8_lossy(&self.name[..end]).into_owned()
	}

	/// Returns the raw name buffer.
	pub fn raw_name(&self) -> &[u8; constants::NAME_SIZE] {
		&self.name
	}

	/// Replaces the raw name buffer, bytes after the first NUL included.
	pub fn set_raw_name(&mut self, name: [u8; constants::NAME_SIZE]) {
		self.name = name;
	}

	/// Sets the player name.
	///
	/// # Errors
	///
	/// The name must be ASCII and shorter than the 16-byte buffer so that a
	/// terminating NUL fits.
	pub fn set_name(&mut self, name: &str) -> Result<(), FileError> {
		if !name.is_ascii() || name.len() >= constants::NAME_SIZE {
			return Err(FileError::invalid_input(
				FileType::Score,
				format!("name must be ASCII and at most {} characters", constants::NAME_SIZE - 1),
			));
		}
		self.name = [0; constants::NAME_SIZE];
		self.name[..name.len()].copy_from_slice(name.as_bytes());
		Ok(())
	}

	/// HAR id, 0..=63
	pub fn har_id(&self) -> u8 {
		self.har_id
	}

	/// Sets the HAR id, keeping the low 6 bits.
	pub fn set_har_id(&mut self, value: u8) {
		self.har_id = value & constants::ID_MASK as u8;
	}

	/// Pilot id, 0..=63
	pub fn pilot_id(&self) -> u8 {
		self.pilot_id
	}

	/// Sets the pilot id, keeping the low 6 bits.
	pub fn set_pilot_id(&mut self, value: u8) {
		self.pilot_id = value & constants::ID_MASK as u8;
	}

	/// Unknown 20-bit field stored above the ids.
	pub fn padding(&self) -> u32 {
		self.padding
	}

	/// Sets the padding field, keeping the low 20 bits.
	pub fn set_padding(&mut self, value: u32) {
		self.padding = value & constants::PADDING_MASK;
	}

	/// Packs HAR id, pilot id and padding into the on-disk id word.
	pub fn pack_id(&self) -> u32 {
		u32::from(self.har_id)
			| (u32::from(self.pilot_id) << constants::PILOT_SHIFT)
			| (self.padding << constants::PADDING_SHIFT)
	}

	/// Unpacks an on-disk id word into this entry.
	pub fn unpack_id(&mut self, word: u32) {
		self.har_id = (word & constants::ID_MASK) as u8;
		self.pilot_id = ((word >> constants::PILOT_SHIFT) & constants::ID_MASK) as u8;
		self.padding = (word >> constants::PADDING_SHIFT) & constants::PADDING_MASK;
	}

	/// Returns `true` if the entry has never been filled in.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Serde does not enforce the field widths, so imported entries are
	/// re-masked before use.
	fn normalized(mut self) -> Self {
		self.set_har_id(self.har_id);
		self.set_pilot_id(self.pilot_id);
		self.set_padding(self.padding);
		self
	}
}

type Page = [ScoreEntry; constants::ENTRIES_PER_PAGE];

/// A complete high score table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
	pages: [Page; constants::PAGES],
}

impl File {
	/// Creates a zeroed table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a score file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be opened or is not exactly
	/// [`constants::FILE_SIZE`] bytes long.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
		<Self as Resource>::load(path)
	}

	/// Parses a score table from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, FileError> {
		<Self as Resource>::from_bytes(data)
	}

	/// Serializes the score table to bytes.
	pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
		<Self as Resource>::to_bytes(self)
	}

	/// Saves the score table to the specified path.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
		<Self as Resource>::save(self, path)
	}

	/// Returns the entry at `index` on `page`.
	pub fn entry(&self, page: usize, index: usize) -> Option<&ScoreEntry> {
		self.pages.get(page)?.get(index)
	}

	/// Mutable variant of [`File::entry`].
	pub fn entry_mut(&mut self, page: usize, index: usize) -> Option<&mut ScoreEntry> {
		self.pages.get_mut(page)?.get_mut(index)
	}

	/// Returns every entry of one page.
	pub fn page(&self, page: usize) -> Option<&[ScoreEntry]> {
		self.pages.get(page).map(|p| p.as_slice())
	}

	/// Iterates over all entries as `(page, index, entry)`, in file order.
	pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ScoreEntry)> {
		self.pages
			.iter()
			.enumerate()
			.flat_map(|(p, page)| page.iter().enumerate().map(move |(i, e)| (p, i, e)))
	}

	/// Masks every id and padding field to its bit width.
	///
	/// Tables built through the setters never need this; tables deserialized
	/// from external data do.
	pub fn normalize(&mut self) {
		for entry in self.pages.iter_mut().flatten() {
			*entry = entry.normalized();
		}
	}
}

impl Resource for File {
	const FILE_TYPE: FileType = FileType::Score;

	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError> {
		let mut table = Self::new();

		for (p, page) in table.pages.iter_mut().enumerate() {
			for (i, entry) in page.iter_mut().enumerate() {
				// all three fields are read before the entry is checked
				let score = reader.read_u32();
				let name = reader.read_buf(&mut entry.name);
				let id = reader.read_u32();

				if !reader.is_ok() {
					trace!("Score entry {} of page {} is incomplete", i, p);
					let first = score.err().or(name.err()).or(id.err());
					return Err(first.unwrap_or(FileError::ReaderFailed {
						offset: reader.offset(),
					}));
				}

				entry.score = score?;
				name?;
				entry.unpack_id(id?);
			}
		}

		Ok(table)
	}

	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError> {
		for entry in self.pages.iter().flatten() {
			writer.write_u32(entry.score)?;
			writer.write_buf(&entry.name, constants::NAME_SIZE)?;
			writer.write_u32(entry.pack_id())?;
		}
		Ok(())
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Score Table:")?;
		for (p, page) in self.pages.iter().enumerate() {
			let used = page.iter().filter(|e| !e.is_empty()).count();
			write!(f, "\n  Page {}: {} of {} entries used", p, used, constants::ENTRIES_PER_PAGE)?;
		}
		Ok(())
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
