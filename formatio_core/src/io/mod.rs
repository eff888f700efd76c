//! Bounded prefix reading for signature inference.
//!
//! Inference looks at no more than [`PREFIX_LENGTH`] leading bytes and must leave the stream as it
//! found it. Seekable streams are rewound with [`peek_prefix`]; anything else can be wrapped in a
//! [`PrefixReader`], which buffers the prefix and replays it.

mod prefix_reader;

pub use prefix_reader::*;

use crate::MAX_SIGNATURE_LENGTH;
use anyhow::{Context, Result};
use std::io::{Read, Seek, SeekFrom};

/// Number of bytes read for signature inference.
pub const PREFIX_LENGTH: usize = MAX_SIGNATURE_LENGTH;

/// Reads up to [`PREFIX_LENGTH`] bytes from the current position, then seeks back to it.
///
/// ```
/// use formatio_core::io::peek_prefix;
/// use std::io::{Cursor, Read};
///
/// let mut cursor = Cursor::new(b"\x1f\x8bpayload".to_vec());
/// assert_eq!(peek_prefix(&mut cursor).unwrap(), b"\x1f\x8bpayload");
///
/// let mut all = Vec::new();
/// cursor.read_to_end(&mut all).unwrap();
/// assert_eq!(all, b"\x1f\x8bpayload");
/// ```
pub fn peek_prefix<R: Read + Seek>(reader: &mut R) -> Result<Vec<u8>> {
	let position = reader
		.stream_position()
		.context("Failed to query the stream position")?;
	let prefix = read_up_to(reader, PREFIX_LENGTH);
	reader
		.seek(SeekFrom::Start(position))
		.context("Failed to restore the stream position")?;
	prefix.context("Failed to read the stream prefix")
}

pub(crate) fn read_up_to<R: Read>(reader: &mut R, limit: usize) -> std::io::Result<Vec<u8>> {
	let mut buffer = Vec::with_capacity(limit);
	reader.take(limit as u64).read_to_end(&mut buffer)?;
	Ok(buffer)
}
