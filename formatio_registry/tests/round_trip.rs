//! Writing a value through the resolved writer and encoder, then reading it back through the
//! resolved decoder and reader, must reproduce the value.

use anyhow::{Result, bail, ensure};
use assert_fs::{TempDir, prelude::*};
use formatio_core::{Coding, Format, FormatHandler, Handler, Value};
use formatio_registry::{Registry, Resource};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::{
	any::Any,
	io::{self, Read, Write},
};

const DELIMITER: u8 = 0x1e;
const MAGIC: &[u8] = b"REC\x1e";

/// Frames a list of records, each terminated by a record separator.
struct Records;

impl FormatHandler for Records {
	fn read(&self, input: &mut dyn Read) -> Result<Value> {
		let mut data = Vec::new();
		input.read_to_end(&mut data)?;
		let Some(body) = data.strip_prefix(MAGIC) else {
			bail!("missing record header");
		};
		ensure!(body.last().is_none_or(|b| *b == DELIMITER), "unterminated record");

		let records = body
			.split(|b| *b == DELIMITER)
			.take(body.iter().filter(|b| **b == DELIMITER).count())
			.map(|record| String::from_utf8(record.to_vec()))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(Box::new(records))
	}

	fn write(&self, output: &mut dyn Write, value: &dyn Any) -> Result<()> {
		let Some(records) = value.downcast_ref::<Vec<String>>() else {
			bail!("expected a list of records");
		};
		output.write_all(MAGIC)?;
		for record in records {
			ensure!(!record.as_bytes().contains(&DELIMITER), "record contains the delimiter");
			output.write_all(record.as_bytes())?;
			output.write_all(&[DELIMITER])?;
		}
		Ok(())
	}
}

fn registry() -> Result<(Registry, Format)> {
	let mut registry = Registry::with_builtins()?;
	let records = registry.add_format_with("text/x-records", &[".rec"], &[MAGIC])?;
	let handler = Handler::new("records", Records);
	registry.add_reader(&records, handler.clone())?;
	registry.add_writer(&records, handler)?;
	Ok((registry, records))
}

fn sample() -> Vec<String> {
	vec![
		"first".to_string(),
		String::new(),
		"third, with unicode: äöü".to_string(),
		"x".repeat(10_000),
	]
}

fn into_records(value: Value) -> Vec<String> {
	*value.downcast::<Vec<String>>().unwrap()
}

#[rstest]
#[case::plain("data.rec")]
#[case::gzip("data.rec.gz")]
#[case::brotli("data.rec.br")]
#[case::zstd("data.rec.zst")]
fn round_trip_in_memory(#[case] name: &str) -> Result<()> {
	let (registry, _) = registry()?;
	let resource = Resource::named(name);

	let mut buffer = Vec::new();
	resource.save_to(&registry, &mut buffer, &sample())?;
	assert!(!buffer.is_empty());

	let value = resource.load_from(&registry, buffer.as_slice())?;
	assert_eq!(into_records(value), sample());
	Ok(())
}

#[rstest]
#[case::plain("data.rec", &[])]
#[case::gzip("data.rec.gz", &[0x1f, 0x8b])]
#[case::zstd("data.rec.zst", &[0x28, 0xb5, 0x2f, 0xfd])]
fn encoded_bytes_carry_the_coding_signature(#[case] name: &str, #[case] magic: &[u8]) -> Result<()> {
	let (registry, _) = registry()?;
	let mut buffer = Vec::new();
	Resource::named(name).save_to(&registry, &mut buffer, &sample())?;
	if magic.is_empty() {
		assert!(buffer.starts_with(MAGIC));
	} else {
		assert!(buffer.starts_with(magic));
	}
	Ok(())
}

#[rstest]
#[case::plain(None)]
#[case::gzip(Some("application/gzip"))]
#[case::brotli(Some("application/x-brotli"))]
fn round_trip_with_explicit_specification(#[case] coding: Option<&str>) -> Result<()> {
	let (registry, records) = registry()?;
	let coding = coding.map(Coding::new).transpose()?;
	let resource = Resource::new().specify(records, coding);

	let mut buffer = Vec::new();
	resource.save_to(&registry, &mut buffer, &sample())?;
	let value = resource.load_from(&registry, buffer.as_slice())?;
	assert_eq!(into_records(value), sample());
	Ok(())
}

/// Accepts `capacity` bytes, then fails every write like a full disk.
struct DiskFull {
	written: Vec<u8>,
	capacity: usize,
}

impl Write for DiskFull {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let room = self.capacity - self.written.len();
		if room == 0 {
			return Err(io::Error::other("disk full"));
		}
		let count = room.min(buf.len());
		self.written.extend_from_slice(&buf[..count]);
		Ok(count)
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

#[rstest]
#[case::plain("data.rec")]
#[case::gzip("data.rec.gz")]
#[case::brotli("data.rec.br")]
#[case::zstd("data.rec.zst")]
fn truncated_output_is_an_error(#[case] name: &str) -> Result<()> {
	let (registry, _) = registry()?;
	let resource = Resource::named(name);

	let mut complete = Vec::new();
	resource.save_to(&registry, &mut complete, &sample())?;

	for capacity in [0, complete.len() / 2, complete.len() - 1] {
		let mut sink = DiskFull {
			written: Vec::new(),
			capacity,
		};
		let result = resource.save_to(&registry, &mut sink, &sample());
		assert!(result.is_err(), "{name} with room for {capacity} of {} bytes", complete.len());
	}
	Ok(())
}

#[test]
fn round_trip_through_files() -> Result<()> {
	let (registry, _) = registry()?;
	let dir = TempDir::new()?;

	for name in ["a.rec", "b.rec.gz", "c.rec.br", "d.rec.zst"] {
		let path = dir.child(name);
		let resource = Resource::named(&path.path().to_string_lossy());
		resource.save(&registry, &sample())?;
		assert!(path.path().is_file());
		assert_eq!(into_records(resource.load(&registry)?), sample());
	}
	Ok(())
}

#[test]
fn unnamed_plain_stream_is_recognized_by_signature() -> Result<()> {
	let (registry, _) = registry()?;
	let mut buffer = Vec::new();
	Resource::named("x.rec").save_to(&registry, &mut buffer, &sample())?;

	let value = Resource::new().load_from(&registry, buffer.as_slice())?;
	assert_eq!(into_records(value), sample());
	Ok(())
}

#[test]
fn wrong_value_type_fails() -> Result<()> {
	let (registry, _) = registry()?;
	let mut buffer = Vec::new();
	let error = Resource::named("x.rec")
		.save_to(&registry, &mut buffer, &42u32)
		.unwrap_err();
	assert_eq!(error.to_string(), "expected a list of records");
	Ok(())
}
