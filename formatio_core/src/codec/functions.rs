use super::{DecoderFactory, EncoderFactory};
use crate::Blob;
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Encodes a whole blob in memory.
///
/// # Arguments
///
/// * `blob` - The data to encode.
/// * `factory` - The encoder of the target coding.
///
/// # Returns
///
/// * `Ok(Blob)` containing the complete encoded stream.
/// * `Err(anyhow::Error)` if encoding fails.
pub fn encode_blob(blob: &Blob, factory: &dyn EncoderFactory) -> Result<Blob> {
	let mut buffer = Vec::new();
	let mut writer = factory.encoder(Box::new(&mut buffer))?;
	writer.write_all(blob.as_slice()).context("Failed to encode blob")?;
	writer.finish()?;
	Ok(Blob::from(buffer))
}

/// Decodes a whole blob in memory.
///
/// # Arguments
///
/// * `blob` - The encoded data.
/// * `factory` - The decoder of the blob's coding.
///
/// # Errors
///
/// * If `blob` is not a valid stream of that coding.
pub fn decode_blob(blob: &Blob, factory: &dyn DecoderFactory) -> Result<Blob> {
	let mut reader = factory.decoder(Box::new(blob.as_slice()))?;
	let mut buffer = Vec::new();
	reader
		.read_to_end(&mut buffer)
		.context("Failed to decode blob")?;
	Ok(Blob::from(buffer))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::{Brotli, Gzip, Zstd};
	use rstest::rstest;
	use std::io;

	/// Accepts `capacity` bytes, then fails every write like a full disk.
	struct DiskFull {
		written: usize,
		capacity: usize,
	}

	impl Write for DiskFull {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			let room = self.capacity - self.written;
			if room == 0 {
				return Err(io::Error::other("disk full"));
			}
			let count = room.min(buf.len());
			self.written += count;
			Ok(count)
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	pub fn generate_test_data(size: usize) -> Blob {
		let mut data = Vec::with_capacity(size);
		let mut state: u32 = 0x1234_5678;
		for i in 0..size {
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			// half pseudo-random, half repetitive so every codec actually shrinks something
			data.push(if i % 2 == 0 { state.to_le_bytes()[0] } else { 42 });
		}
		Blob::from(data)
	}

	#[rstest]
	#[case::gzip(&Gzip, &Gzip)]
	#[case::brotli(&Brotli, &Brotli)]
	#[case::zstd(&Zstd, &Zstd)]
	fn encodes_and_decodes(#[case] encoder: &dyn EncoderFactory, #[case] decoder: &dyn DecoderFactory) -> Result<()> {
		let data = generate_test_data(100_000);
		let encoded = encode_blob(&data, encoder)?;
		assert_ne!(encoded, data);
		assert!(encoded.len() < data.len());
		let decoded = decode_blob(&encoded, decoder)?;
		assert_eq!(decoded, data);
		Ok(())
	}

	#[rstest]
	#[case::gzip(&Gzip, 4)]
	#[case::gzip_trailer(&Gzip, 27)]
	#[case::brotli(&Brotli, 4)]
	#[case::zstd(&Zstd, 4)]
	fn write_failures_surface(#[case] factory: &dyn EncoderFactory, #[case] capacity: usize) {
		let mut sink = DiskFull { written: 0, capacity };
		let mut writer = factory.encoder(Box::new(&mut sink)).unwrap();
		let result = match writer.write_all(b"hello world") {
			Ok(()) => writer.finish(),
			Err(error) => Err(error.into()),
		};
		assert!(result.is_err());
	}

	#[test]
	fn gzip_output_starts_with_signature() -> Result<()> {
		let encoded = encode_blob(&Blob::from("hello"), &Gzip)?;
		assert!(encoded.as_slice().starts_with(Gzip::SIGNATURE));
		Ok(())
	}

	#[test]
	fn zstd_output_starts_with_signature() -> Result<()> {
		let encoded = encode_blob(&Blob::from("hello"), &Zstd)?;
		assert!(encoded.as_slice().starts_with(Zstd::SIGNATURE));
		Ok(())
	}

	#[test]
	fn decoding_garbage_fails() {
		assert!(decode_blob(&Blob::from("definitely not gzip"), &Gzip).is_err());
	}

	#[test]
	fn empty_blob() -> Result<()> {
		let encoded = encode_blob(&Blob::new_empty(), &Gzip)?;
		assert_eq!(decode_blob(&encoded, &Gzip)?, Blob::new_empty());
		Ok(())
	}
}
