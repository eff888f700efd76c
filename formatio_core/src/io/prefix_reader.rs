use super::{PREFIX_LENGTH, read_up_to};
use anyhow::{Context, Result};
use std::io::{self, Read};

/// Wraps a stream that cannot seek, buffering its first [`PREFIX_LENGTH`] bytes.
///
/// The buffered prefix is available through [`prefix`](Self::prefix) and is replayed by the
/// first reads, so consumers still see the complete original content.
///
/// ```
/// use formatio_core::io::PrefixReader;
/// use std::io::Read;
///
/// let mut reader = PrefixReader::new(&b"PK\x03\x04rest"[..]).unwrap();
/// assert_eq!(&reader.prefix()[..2], b"PK");
///
/// let mut all = Vec::new();
/// reader.read_to_end(&mut all).unwrap();
/// assert_eq!(all, b"PK\x03\x04rest");
/// ```
#[derive(Debug)]
pub struct PrefixReader<R> {
	inner: R,
	prefix: Vec<u8>,
	offset: usize,
}

impl<R: Read> PrefixReader<R> {
	pub fn new(mut inner: R) -> Result<Self> {
		let prefix = read_up_to(&mut inner, PREFIX_LENGTH).context("Failed to read the stream prefix")?;
		Ok(Self {
			inner,
			prefix,
			offset: 0,
		})
	}

	pub fn prefix(&self) -> &[u8] {
		&self.prefix
	}
}

impl<R: Read> Read for PrefixReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let pending = &self.prefix[self.offset..];
		if pending.is_empty() {
			return self.inner.read(buf);
		}
		let length = pending.len().min(buf.len());
		buf[..length].copy_from_slice(&pending[..length]);
		self.offset += length;
		Ok(length)
	}
}
