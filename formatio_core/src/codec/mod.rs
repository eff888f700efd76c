//! Decoder and encoder factories for codings.
//!
//! A factory wraps a caller-supplied stream so that bytes flowing through it are transcoded.
//! The registry only stores factories; collaborators invoke them.
//!
//! Built-in factories:
//! - [`Gzip`] (`application/gzip`)
//! - [`Brotli`] (`application/x-brotli`)
//! - [`Zstd`] (`application/zstd`)

mod functions;
mod method_brotli;
mod method_gzip;
mod method_zstd;

pub use functions::*;
pub use method_brotli::Brotli;
pub use method_gzip::Gzip;
pub use method_zstd::Zstd;

use anyhow::Result;
use std::io::{Read, Write};

/// Produces a reader that decodes the bytes of `input`.
pub trait DecoderFactory: Send + Sync {
	/// Wraps `input` so that reading yields the decoded bytes.
	///
	/// # Arguments
	///
	/// * `input` - The encoded stream.
	///
	/// # Errors
	///
	/// * If the decoder cannot be set up, e.g. when its dictionary cannot be allocated.
	fn decoder<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Box<dyn Read + 'a>>;
}

/// Produces a writer that encodes everything written to it into `output`.
pub trait EncoderFactory: Send + Sync {
	/// Wraps `output` in an encoder.
	///
	/// # Arguments
	///
	/// * `output` - The stream that receives the encoded bytes.
	///
	/// # Returns
	///
	/// * `Ok(writer)` that has to be [finished](EncodingWriter::finish) to complete the encoded stream.
	/// * `Err(anyhow::Error)` if the encoder cannot be set up.
	fn encoder<'a>(&self, output: Box<dyn Write + 'a>) -> Result<Box<dyn EncodingWriter + 'a>>;
}

/// A writer returned by [`EncoderFactory::encoder`].
///
/// Dropping it without calling [`finish`](Self::finish) may leave the encoded stream truncated.
pub trait EncodingWriter: Write {
	/// Writes the end of the encoded stream and flushes the underlying output.
	///
	/// # Errors
	///
	/// * If any of the final writes fails, for example because the disk is full.
	fn finish(self: Box<Self>) -> Result<()>;
}
