//! Bounds-checked sequential reader used by every record codec.
//!
//! The reader tracks its byte offset and carries a sticky failure flag: once a
//! read runs past the end of input (or the source reports an error) every later
//! read fails immediately with [`FileError::ReaderFailed`] and performs no I/O.
//! Each read also returns a `Result`, so codecs propagate the first failure with
//! `?` and [`Reader::is_ok`] remains available as a per-record checkpoint.
//!
//! All multi-byte values are little-endian.

use std::{
	fs,
	io::{self, BufReader, Read},
	path::Path,
};

use log::{debug, trace};

use super::{FileError, FileType};

/// Sequential little-endian reader with a sticky error state.
#[derive(Debug)]
pub struct Reader<R = BufReader<fs::File>> {
	inner: R,
	file_type: FileType,
	offset: u64,
	failed: bool,
}

impl Reader<BufReader<fs::File>> {
	/// Opens a buffered reader over the file at `path`.
	///
	/// # Errors
	///
	/// Returns [`FileError::FileOpen`] if the file cannot be opened.
	pub fn open(path: impl AsRef<Path>, file_type: FileType) -> Result<Self, FileError> {
		let path = path.as_ref();
		let file = fs::File::open(path).map_err(|source| FileError::FileOpen {
			path: path.to_path_buf(),
			source,
		})?;
		debug!("Opened {} reader on {}", file_type, path.display());
		Ok(Self::new(BufReader::new(file), file_type))
	}
}

impl<'a> Reader<&'a [u8]> {
	/// Creates a reader over an in-memory byte slice.
	pub fn from_bytes(data: &'a [u8], file_type: FileType) -> Self {
		Self::new(data, file_type)
	}
}

impl<R: Read> Reader<R> {
	/// Wraps an arbitrary byte source.
	pub fn new(inner: R, file_type: FileType) -> Self {
		Self {
			inner,
			file_type,
			offset: 0,
			failed: false,
		}
	}

	/// Returns the file type used to tag errors raised by this reader.
	pub fn file_type(&self) -> FileType {
		self.file_type
	}

	/// Returns the number of bytes consumed so far.
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// Returns `false` once any read has failed.
	pub fn is_ok(&self) -> bool {
		!self.failed
	}

	/// Fills `buf` completely.
	///
	/// On a short read the unread tail of `buf` is zero-filled, the reader
	/// enters the failed state and [`FileError::InsufficientData`] is returned.
	pub fn read_buf(&mut self, buf: &mut [u8]) -> Result<(), FileError> {
		if self.failed {
			buf.fill(0);
			return Err(FileError::ReaderFailed {
				offset: self.offset,
			});
		}

		let start = self.offset;
		let mut filled = 0;
		while filled < buf.len() {
			match self.inner.read(&mut buf[filled..]) {
				Ok(0) => break,
				Ok(n) => filled += n,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => {
					buf[filled..].fill(0);
					self.offset += filled as u64;
					self.failed = true;
					return Err(FileError::Io(e));
				}
			}
		}
		self.offset += filled as u64;

		if filled < buf.len() {
			buf[filled..].fill(0);
			self.failed = true;
			trace!(
				"{} reader ran out of data at offset {} ({} of {} bytes)",
				self.file_type,
				start,
				filled,
				buf.len()
			);
			return Err(FileError::insufficient_data(self.file_type, start, buf.len(), filled));
		}

		Ok(())
	}

	/// Reads exactly `N` bytes into an array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FileError> {
		let mut buf = [0u8; N];
		self.read_buf(&mut buf)?;
		Ok(buf)
	}

	/// Reads `len` bytes into a freshly allocated vector.
	///
	/// The allocation is reserved fallibly since `len` usually comes from the
	/// file itself.
	pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, FileError> {
		let mut data = Vec::new();
		data.try_reserve_exact(len).map_err(|source| FileError::OutOfMemory {
			file_type: self.file_type,
			requested: len,
			source,
		})?;
		data.resize(len, 0);
		self.read_buf(&mut data)?;
		Ok(data)
	}

	/// Reads an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8, FileError> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a signed byte.
	pub fn read_i8(&mut self) -> Result<i8, FileError> {
		Ok(i8::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16, FileError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16, FileError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32, FileError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32, FileError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Succeeds only if the source has no bytes left.
	///
	/// Used by whole-file decoders to reject trailing garbage.
	pub fn expect_eof(&mut self) -> Result<(), FileError> {
		if self.failed {
			return Err(FileError::ReaderFailed {
				offset: self.offset,
			});
		}

		let mut probe = [0u8; 1];
		loop {
			match self.inner.read(&mut probe) {
				Ok(0) => return Ok(()),
				Ok(_) => {
					self.failed = true;
					return Err(FileError::corrupt(
						self.file_type,
						self.offset,
						"unexpected trailing data",
					));
				}
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
				Err(e) => {
					self.failed = true;
					return Err(FileError::Io(e));
				}
			}
		}
	}

	/// Closes the reader and releases the underlying source.
	pub fn close(self) {
		trace!("Closed {} reader at offset {}", self.file_type, self.offset);
	}
}
