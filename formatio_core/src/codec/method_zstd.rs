use super::{DecoderFactory, EncoderFactory, EncodingWriter};
use anyhow::{Context, Result};
use std::io::{Read, Write};
use zstd::stream::{read::Decoder, write::Encoder};

// Zstd compression level range: 1-22, default is 3
const LEVEL: i32 = 19;

#[derive(Clone, Copy, Debug, Default)]
pub struct Zstd;

impl Zstd {
	pub const CODING: &'static str = "application/zstd";
	pub const EXTENSION: &'static str = ".zst";
	pub const SIGNATURE: &'static [u8] = &[0x28, 0xb5, 0x2f, 0xfd];
}

impl DecoderFactory for Zstd {
	fn decoder<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Box<dyn Read + 'a>> {
		let decoder = Decoder::new(input).context("Failed to create Zstd decoder")?;
		Ok(Box::new(decoder))
	}
}

impl EncoderFactory for Zstd {
	fn encoder<'a>(&self, output: Box<dyn Write + 'a>) -> Result<Box<dyn EncodingWriter + 'a>> {
		let encoder = Encoder::new(output, LEVEL).context("Failed to create Zstd encoder")?;
		Ok(Box::new(encoder))
	}
}

impl<W: Write> EncodingWriter for Encoder<'_, W> {
	fn finish(self: Box<Self>) -> Result<()> {
		let mut output = Encoder::finish(*self).context("Failed to finish Zstd stream")?;
		output.flush().context("Failed to flush Zstd output")
	}
}
