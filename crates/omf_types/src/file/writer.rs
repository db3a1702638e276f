//! Sequential writer used by every record codec.
//!
//! Writes mirror [`Reader`](super::Reader) field for field. Unlike the reader
//! there is no sticky state: a failed write is reported straight away.

use std::{
	fs,
	io::{BufWriter, Write},
	path::Path,
};

use log::{debug, trace};

use super::FileError;

/// Sequential little-endian writer.
#[derive(Debug)]
pub struct Writer<W = BufWriter<fs::File>> {
	inner: W,
	offset: u64,
}

impl Writer<BufWriter<fs::File>> {
	/// Creates (or truncates) the file at `path` and wraps it in a buffered writer.
	///
	/// # Errors
	///
	/// Returns [`FileError::FileOpen`] if the file cannot be created.
	pub fn create(path: impl AsRef<Path>) -> Result<Self, FileError> {
		let path = path.as_ref();
		let file = fs::File::create(path).map_err(|source| FileError::FileOpen {
			path: path.to_path_buf(),
			source,
		})?;
		debug!("Opened writer on {}", path.display());
		Ok(Self::new(BufWriter::new(file)))
	}
}

impl Writer<Vec<u8>> {
	/// Creates a writer that collects output in memory.
	pub fn in_memory() -> Self {
		Self::new(Vec::new())
	}

	/// Consumes the writer and returns the collected bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.inner
	}
}

impl<W: Write> Writer<W> {
	/// Wraps an arbitrary byte sink.
	pub fn new(inner: W) -> Self {
		Self {
			inner,
			offset: 0,
		}
	}

	/// Returns the number of bytes written so far.
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// Writes `data` unchanged.
	pub fn write_all(&mut self, data: &[u8]) -> Result<(), FileError> {
		self.inner.write_all(data)?;
		self.offset += data.len() as u64;
		Ok(())
	}

	/// Writes exactly `len` bytes: `data` truncated to `len`, or zero-padded up to it.
	pub fn write_buf(&mut self, data: &[u8], len: usize) -> Result<(), FileError> {
		let used = data.len().min(len);
		self.write_all(&data[..used])?;
		const ZEROS: [u8; 64] = [0; 64];
		let mut remaining = len - used;
		while remaining > 0 {
			let chunk = remaining.min(ZEROS.len());
			self.write_all(&ZEROS[..chunk])?;
			remaining -= chunk;
		}
		Ok(())
	}

	/// Writes an unsigned byte.
	pub fn write_u8(&mut self, value: u8) -> Result<(), FileError> {
		self.write_all(&[value])
	}

	/// Writes a signed byte.
	pub fn write_i8(&mut self, value: i8) -> Result<(), FileError> {
		self.write_all(&value.to_le_bytes())
	}

	/// Writes a little-endian `u16`.
	pub fn write_u16(&mut self, value: u16) -> Result<(), FileError> {
		self.write_all(&value.to_le_bytes())
	}

	/// Writes a little-endian `i16`.
	pub fn write_i16(&mut self, value: i16) -> Result<(), FileError> {
		self.write_all(&value.to_le_bytes())
	}

	/// Writes a little-endian `u32`.
	pub fn write_u32(&mut self, value: u32) -> Result<(), FileError> {
		self.write_all(&value.to_le_bytes())
	}

	/// Writes a little-endian `i32`.
	pub fn write_i32(&mut self, value: i32) -> Result<(), FileError> {
		self.write_all(&value.to_le_bytes())
	}

	/// Flushes every buffered byte and returns the sink.
	pub fn close(mut self) -> Result<W, FileError> {
		self.inner.flush()?;
		trace!("Closed writer after {} bytes", self.offset);
		Ok(self.inner)
	}
}
