//! Uniform lifecycle shared by every resource codec.
//!
//! A codec only has to describe how one record is decoded from a [`Reader`]
//! and encoded to a [`Writer`]; loading from disk, saving, and in-memory
//! conversion are provided on top of that. Nested records (a sprite inside an
//! animation inside a move) call each other's `decode`/`encode` on the same
//! reader or writer.
//!
//! Creation is [`Default`], copying is [`Clone`] and freeing is [`Drop`].

use std::{
	io::{Read, Write},
	path::Path,
};

use log::{debug, warn};

use super::{FileError, FileType, Reader, Writer};

/// A record that can be decoded from and encoded to its on-disk layout.
pub trait Resource: Sized + Default + Clone {
	/// File type used to tag errors and log output.
	const FILE_TYPE: FileType;

	/// Decodes one record starting at the reader's current position.
	fn decode<R: Read>(reader: &mut Reader<R>) -> Result<Self, FileError>;

	/// Encodes the record at the writer's current position.
	fn encode<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), FileError>;

	/// Loads a complete resource file.
	///
	/// The whole file must be consumed; trailing bytes are a parse error.
	fn load(path: impl AsRef<Path>) -> Result<Self, FileError> {
		let path = path.as_ref();
		let mut reader = Reader::open(path, Self::FILE_TYPE)?;
		let result = Self::decode(&mut reader).and_then(|value| {
			reader.expect_eof()?;
			Ok(value)
		});
		reader.close();

		match &result {
			Ok(_) => debug!("Loaded {} from {}", Self::FILE_TYPE, path.display()),
			Err(e) => warn!("Failed to load {} from {}: {}", Self::FILE_TYPE, path.display(), e),
		}
		result
	}

	/// Saves the resource to `path`, creating or truncating the file.
	fn save(&self, path: impl AsRef<Path>) -> Result<(), FileError> {
		let path = path.as_ref();
		let mut writer = Writer::create(path)?;
		self.encode(&mut writer)?;
		let written = writer.offset();
		writer.close()?;
		debug!("Saved {} ({} bytes) to {}", Self::FILE_TYPE, written, path.display());
		Ok(())
	}

	/// Decodes a complete resource from an in-memory buffer.
	fn from_bytes(data: &[u8]) -> Result<Self, FileError> {
		let mut reader = Reader::from_bytes(data, Self::FILE_TYPE);
		let value = Self::decode(&mut reader)?;
		reader.expect_eof()?;
		Ok(value)
	}

	/// Encodes the resource into a new buffer.
	fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
		let mut writer = Writer::in_memory();
		self.encode(&mut writer)?;
		Ok(writer.into_bytes())
	}
}
