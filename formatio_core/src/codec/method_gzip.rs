use super::{DecoderFactory, EncoderFactory, EncodingWriter};
use anyhow::{Context, Result};
use flate2::{Compression, read::MultiGzDecoder, write::GzEncoder};
use std::io::{Read, Write};

/// Gzip codec backed by `flate2`. Decoding accepts concatenated gzip members.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gzip;

impl Gzip {
	pub const CODING: &'static str = "application/gzip";
	pub const EXTENSION: &'static str = ".gz";
	pub const SIGNATURE: &'static [u8] = &[0x1f, 0x8b];
}

impl DecoderFactory for Gzip {
	fn decoder<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Box<dyn Read + 'a>> {
		Ok(Box::new(MultiGzDecoder::new(input)))
	}
}

impl EncoderFactory for Gzip {
	fn encoder<'a>(&self, output: Box<dyn Write + 'a>) -> Result<Box<dyn EncodingWriter + 'a>> {
		Ok(Box::new(GzEncoder::new(output, Compression::best())))
	}
}

impl<W: Write> EncodingWriter for GzEncoder<W> {
	fn finish(self: Box<Self>) -> Result<()> {
		let mut output = GzEncoder::finish(*self).context("Failed to finish Gzip stream")?;
		output.flush().context("Failed to flush Gzip output")
	}
}
