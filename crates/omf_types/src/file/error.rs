//! Error types for file format parsing and manipulation.

use std::{collections::TryReserveError, fmt, io, path::PathBuf};

use thiserror::Error;

/// Resource kinds handled by the codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.AF` HAR archive
	Af,
	/// Move record embedded in an AF archive
	Move,
	/// Animation record embedded in a move
	Animation,
	/// Sprite record embedded in an animation
	Sprite,
	/// `SCORES.DAT` high score table
	Score,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Af => write!(f, "AF"),
			Self::Move => write!(f, "Move"),
			Self::Animation => write!(f, "Animation"),
			Self::Sprite => write!(f, "Sprite"),
			Self::Score => write!(f, "Score"),
		}
	}
}

/// Coarse classification shared by every codec.
///
/// Callers that only care about the failure class (for example to decide
/// whether a partially written file should be removed) match on this instead
/// of the individual [`FileError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Out-of-range index or a field that cannot be represented on disk.
	InvalidInput,
	/// The path could not be opened or created.
	FileOpen,
	/// Truncated or malformed data.
	Parse,
	/// An allocation for variable-length data failed.
	OutOfMemory,
	/// Any other I/O failure while streaming.
	Io,
}

/// Unified error type for every resource codec.
#[derive(Debug, Error)]
pub enum FileError {
	/// Invalid argument supplied by the caller
	#[error("{file_type} invalid input: {message}")]
	InvalidInput {
		/// File type involved
		file_type: FileType,
		/// Human readable description
		message: String,
	},

	/// The file could not be opened for reading or created for writing
	#[error("Cannot open '{}': {source}", path.display())]
	FileOpen {
		/// Path that failed to open
		path: PathBuf,
		/// Underlying I/O error
		#[source]
		source: io::Error,
	},

	/// The input ended before the record was complete
	#[error(
		"{file_type} insufficient data at offset {offset}: expected {expected} bytes, got {actual} bytes"
	)]
	InsufficientData {
		/// File type involved
		file_type: FileType,
		/// Byte offset where the short read started
		offset: u64,
		/// Number of bytes requested
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// Structurally invalid data (bad marker, trailing bytes, ...)
	#[error("{file_type} corrupt data at offset {offset}: {message}")]
	Corrupt {
		/// File type involved
		file_type: FileType,
		/// Byte offset of the offending field
		offset: u64,
		/// Human readable description
		message: String,
	},

	/// A read was attempted after an earlier read already failed
	#[error("Reader is in a failed state at offset {offset}")]
	ReaderFailed {
		/// Offset where the reader stopped
		offset: u64,
	},

	/// Allocation for a variable-length buffer failed
	#[error("{file_type} out of memory allocating {requested} bytes")]
	OutOfMemory {
		/// File type involved
		file_type: FileType,
		/// Number of bytes requested
		requested: usize,
		/// Underlying reservation error
		#[source]
		source: TryReserveError,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] io::Error),
}

impl FileError {
	/// Creates an [`FileError::InvalidInput`] error.
	pub fn invalid_input(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidInput {
			file_type,
			message: message.into(),
		}
	}

	/// Creates an [`FileError::InsufficientData`] error.
	pub fn insufficient_data(
		file_type: FileType,
		offset: u64,
		expected: usize,
		actual: usize,
	) -> Self {
		Self::InsufficientData {
			file_type,
			offset,
			expected,
			actual,
		}
	}

	/// Creates a [`FileError::Corrupt`] error.
	pub fn corrupt(file_type: FileType, offset: u64, message: impl Into<String>) -> Self {
		Self::Corrupt {
			file_type,
			offset,
			message: message.into(),
		}
	}

	/// Returns the coarse failure class of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::InvalidInput {
				..
			} => ErrorKind::InvalidInput,
			Self::FileOpen {
				..
			} => ErrorKind::FileOpen,
			Self::InsufficientData {
				..
			}
			| Self::Corrupt {
				..
			}
			| Self::ReaderFailed {
				..
			} => ErrorKind::Parse,
			Self::OutOfMemory {
				..
			} => ErrorKind::OutOfMemory,
			Self::Io(_) => ErrorKind::Io,
		}
	}

	/// Returns `true` for truncated or malformed input.
	pub fn is_parse_error(&self) -> bool {
		self.kind() == ErrorKind::Parse
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_classification() {
		let err = FileError::insufficient_data(FileType::Af, 26, 30, 4);
		assert_eq!(err.kind(), ErrorKind::Parse);
		assert!(err.is_parse_error());

		let err = FileError::invalid_input(FileType::Af, "index 70 out of range");
		assert_eq!(err.kind(), ErrorKind::InvalidInput);

		let err = FileError::FileOpen {
			path: PathBuf::from("missing.af"),
			source: io::Error::from(io::ErrorKind::NotFound),
		};
		assert_eq!(err.kind(), ErrorKind::FileOpen);
		assert!(err.to_string().contains("missing.af"));
	}
}
