use super::{DecoderFactory, EncoderFactory, EncodingWriter};
use anyhow::{Context, Result};
use brotli::{CompressorWriter, Decompressor};
use std::io::{self, Read, Write};

const BUFFER_SIZE: usize = 4096;
const QUALITY: u32 = 10;
const WINDOW_SIZE: u32 = 19;

/// Brotli codec. Brotli streams carry no magic number, so it is only ever inferred by extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct Brotli;

impl Brotli {
	pub const CODING: &'static str = "application/x-brotli";
	pub const EXTENSION: &'static str = ".br";
}

impl DecoderFactory for Brotli {
	fn decoder<'a>(&self, input: Box<dyn Read + 'a>) -> Result<Box<dyn Read + 'a>> {
		Ok(Box::new(Decompressor::new(input, BUFFER_SIZE)))
	}
}

impl EncoderFactory for Brotli {
	fn encoder<'a>(&self, output: Box<dyn Write + 'a>) -> Result<Box<dyn EncodingWriter + 'a>> {
		let output = ErrorLatch { inner: output, error: None };
		Ok(Box::new(CompressorWriter::new(output, BUFFER_SIZE, QUALITY, WINDOW_SIZE)))
	}
}

impl<W: Write> EncodingWriter for CompressorWriter<ErrorLatch<W>> {
	fn finish(self: Box<Self>) -> Result<()> {
		// `into_inner` writes the end of the stream but discards any error doing so
		let mut output = CompressorWriter::into_inner(*self);
		if let Some(error) = output.error.take() {
			return Err(error).context("Failed to finish Brotli stream");
		}
		output.inner.flush().context("Failed to flush Brotli output")
	}
}

/// Passes writes through and keeps a copy of the first failure.
struct ErrorLatch<W> {
	inner: W,
	error: Option<io::Error>,
}

impl<W> ErrorLatch<W> {
	fn record<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
		if let Some(error) = result.as_ref().err().filter(|e| e.kind() != io::ErrorKind::Interrupted) {
			self.error.get_or_insert_with(|| io::Error::new(error.kind(), error.to_string()));
		}
		result
	}
}

impl<W: Write> Write for ErrorLatch<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let result = self.inner.write(buf);
		self.record(result)
	}

	fn flush(&mut self) -> io::Result<()> {
		let result = self.inner.flush();
		self.record(result)
	}
}
