//! This module provides the [`Blob`] struct, a thin wrapper around [`Vec<u8>`] used when whole
//! payloads are transcoded in memory.
//!
//! ```rust
//! use formatio_core::Blob;
//!
//! let blob = Blob::from("Xylofön");
//! assert_eq!(blob.len(), 8);
//! assert_eq!(blob.as_str(), "Xylofön");
//! ```

use std::fmt::{self, Debug, Formatter};

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the bytes as UTF-8, or returns a placeholder if they are not valid UTF-8.
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(&self.0).unwrap_or("<invalid utf-8>")
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(value: &str) -> Self {
		Blob(value.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(value: String) -> Self {
		Blob(value.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let preview = &self.0[..self.0.len().min(16)];
		write!(f, "Blob({}): {preview:?}", self.0.len())?;
		if self.0.len() > preview.len() {
			f.write_str("...")?;
		}
		Ok(())
	}
}
