//! What is known about one resource: its name, an explicit format/coding specification, and the
//! candidates inference found.
//!
//! A [`Resource`] is never changed in place. Every `specify`/`infer_*` call returns a new value.
//! An explicit format always wins over inference, and once a format is specified the coding is
//! never inferred either.

use crate::{Candidates, Registry, resolution::first_guess};
use anyhow::{Context, Result, bail};
use formatio_core::{
	Coding, DiagnosticBus, DiagnosticKind, Format, RegistryError, Value,
	io::{PrefixReader, peek_prefix},
};
use std::{
	any::Any,
	fs::File,
	io::{BufReader, BufWriter, Read, Seek, Write},
	path::Path,
};

const UNNAMED: &str = "<unnamed>";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
	name: Option<String>,
	specified_format: Option<Format>,
	specified_coding: Option<Coding>,
	guesses: Candidates,
}

impl Resource {
	/// A resource without a name, such as standard input.
	pub fn new() -> Self {
		Self::default()
	}

	/// A resource known by a file name or path, e.g. `"data/kitten.png.gz"`.
	pub fn named(name: &str) -> Self {
		Self {
			name: Some(name.to_string()),
			..Self::default()
		}
	}

	/// Returns a copy with an explicit format and coding. `coding` may be `None` for plain data.
	#[must_use]
	pub fn specify(&self, format: Format, coding: Option<Coding>) -> Self {
		Self {
			specified_format: Some(format),
			specified_coding: coding,
			..self.clone()
		}
	}

	/// Returns a copy whose candidates come from the resource name. Unnamed resources get none.
	#[must_use]
	pub fn infer_from_name(&self, registry: &Registry) -> Self {
		let guesses = match &self.name {
			Some(name) => registry.infer_from_name(name),
			None => Candidates::default(),
		};
		self.with_candidates(guesses)
	}

	/// Returns a copy whose candidates come from the leading bytes of the resource.
	#[must_use]
	pub fn infer_from_bytes(&self, registry: &Registry, prefix: &[u8]) -> Self {
		self.with_candidates(registry.infer_from_bytes(prefix))
	}

	/// Like [`infer_from_bytes`](Self::infer_from_bytes), peeking at a seekable stream.
	pub fn infer_from_reader<R: Read + Seek>(&self, registry: &Registry, reader: &mut R) -> Result<Self> {
		let prefix = peek_prefix(reader)?;
		Ok(self.infer_from_bytes(registry, &prefix))
	}

	/// Returns a copy with candidates found elsewhere, e.g. by a caller-side content sniffer.
	#[must_use]
	pub fn with_candidates(&self, guesses: Candidates) -> Self {
		Self {
			guesses,
			..self.clone()
		}
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn specified_format(&self) -> Option<&Format> {
		self.specified_format.as_ref()
	}

	pub fn specified_coding(&self) -> Option<&Coding> {
		self.specified_coding.as_ref()
	}

	pub fn format_guesses(&self) -> &[Format] {
		&self.guesses.formats
	}

	pub fn coding_guesses(&self) -> &[Coding] {
		&self.guesses.codings
	}

	/// The format to use: the specified one, otherwise the first guess.
	///
	/// Several guesses emit [`DiagnosticKind::AmbiguousFormat`]; none at all is
	/// [`RegistryError::UnknownFormat`].
	pub fn resolve_format(&self, bus: &DiagnosticBus) -> Result<Format, RegistryError> {
		if let Some(format) = &self.specified_format {
			return Ok(format.clone());
		}
		first_guess(&self.guesses.formats, self.display_name(), DiagnosticKind::AmbiguousFormat, bus)
			.cloned()
			.ok_or_else(|| RegistryError::UnknownFormat {
				resource: self.display_name().to_string(),
			})
	}

	/// The coding to use, if any.
	///
	/// With a specified format this is exactly the specified coding, guesses are not consulted.
	/// Otherwise the first coding guess, emitting [`DiagnosticKind::AmbiguousCoding`] when there
	/// are several.
	pub fn resolve_coding(&self, bus: &DiagnosticBus) -> Option<Coding> {
		if self.specified_format.is_some() {
			return self.specified_coding.clone();
		}
		first_guess(&self.guesses.codings, self.display_name(), DiagnosticKind::AmbiguousCoding, bus).cloned()
	}

	fn display_name(&self) -> &str {
		self.name.as_deref().unwrap_or(UNNAMED)
	}

	fn path(&self) -> Result<&Path> {
		match &self.name {
			Some(name) => Ok(Path::new(name)),
			None => bail!("an unnamed resource cannot be opened as a file"),
		}
	}

	// ---------------------------------------------------------------------
	// reading and writing
	// ---------------------------------------------------------------------

	/// Opens the file this resource is named after and reads it. See [`load_from`](Self::load_from).
	///
	/// # Errors
	///
	/// * If the resource is unnamed or the file cannot be opened.
	/// * Everything [`load_from`](Self::load_from) fails with.
	pub fn load(&self, registry: &Registry) -> Result<Value> {
		let path = self.path()?;
		let file = File::open(path).with_context(|| format!("Failed to open {path:?}"))?;
		self.load_from(registry, BufReader::new(file))
			.with_context(|| format!("Failed to load {path:?}"))
	}

	/// Reads a value from `input`.
	///
	/// Without a specified format, candidates are inferred from the name. When the name gives no
	/// format, the leading bytes of `input` are tried instead. The resolved coding's decoder wraps
	/// the stream before the resolved reader consumes it.
	///
	/// # Arguments
	///
	/// * `registry` - Supplies candidates, the reader and the decoder.
	/// * `input` - The possibly encoded bytes. It does not need to be seekable.
	///
	/// # Returns
	///
	/// * `Ok(Value)` as produced by the resolved reader.
	/// * `Err(anyhow::Error)` wrapping a [`RegistryError`] if format, reader or decoder cannot be
	///   resolved, or the reader's or decoder's own error.
	pub fn load_from<'a, R: Read + 'a>(&self, registry: &Registry, input: R) -> Result<Value> {
		let input = PrefixReader::new(input)?;
		let resource = self.inferred_for_reading(registry, input.prefix());

		let bus = registry.diagnostics();
		let coding = resource.resolve_coding(bus);
		let format = resource.resolve_format(bus)?;
		let reader = registry.resolve_reader(&format)?;

		let mut input: Box<dyn Read + 'a> = Box::new(input);
		if let Some(coding) = &coding {
			input = registry.resolve_decoder(coding)?.decoder(input)?;
		}
		log::debug!(
			"reading '{}' as '{format}' ({}) with '{reader}'",
			resource.display_name(),
			coding.as_ref().map_or("plain", Coding::as_str)
		);
		reader.read(&mut input)
	}

	fn inferred_for_reading(&self, registry: &Registry, prefix: &[u8]) -> Self {
		if self.specified_format.is_some() {
			return self.clone();
		}
		let from_name = self.infer_from_name(registry);
		if !from_name.guesses.formats.is_empty() {
			return from_name;
		}
		let from_bytes = self.infer_from_bytes(registry, prefix);
		if from_bytes.guesses.is_empty() {
			from_name
		} else {
			from_bytes
		}
	}

	/// Creates the file this resource is named after and writes `value` into it.
	///
	/// # Errors
	///
	/// * If the resource is unnamed or the file cannot be created.
	/// * Everything [`save_to`](Self::save_to) fails with.
	pub fn save(&self, registry: &Registry, value: &dyn Any) -> Result<()> {
		let path = self.path()?;
		let file = File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
		self.save_to(registry, BufWriter::new(file), value)
			.with_context(|| format!("Failed to save {path:?}"))
	}

	/// Writes `value` to `output`, choosing writer and encoder from the specification or the name.
	///
	/// Succeeds only once everything, including the end of an encoded stream, reached `output`
	/// and `output` was flushed.
	///
	/// # Errors
	///
	/// * If format, writer or encoder cannot be resolved, see [`Registry::resolve_writer`].
	/// * If the writer rejects `value`.
	/// * If writing to `output` fails.
	pub fn save_to<'a, W: Write + 'a>(&self, registry: &Registry, output: W, value: &dyn Any) -> Result<()> {
		let resource = if self.specified_format.is_some() {
			self.clone()
		} else {
			self.infer_from_name(registry)
		};

		let bus = registry.diagnostics();
		let coding = resource.resolve_coding(bus);
		let format = resource.resolve_format(bus)?;
		let writer = registry.resolve_writer(&format)?;

		log::debug!(
			"writing '{}' as '{format}' ({}) with '{writer}'",
			resource.display_name(),
			coding.as_ref().map_or("plain", Coding::as_str)
		);
		let mut output: Box<dyn Write + 'a> = Box::new(output);
		match &coding {
			Some(coding) => {
				let mut encoder = registry.resolve_encoder(coding)?.encoder(output)?;
				writer.write(&mut encoder, value)?;
				encoder.finish()
			}
			None => {
				writer.write(&mut output, value)?;
				output.flush().context("Failed to flush output")
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::png_registry;
	use assert_fs::{TempDir, prelude::*};
	use formatio_core::{DiagnosticLog, ErrorKind, FormatHandler, Handler};
	use pretty_assertions::assert_eq;

	/// Reads and writes `String`s verbatim.
	struct Text;

	impl FormatHandler for Text {
		fn read(&self, input: &mut dyn Read) -> Result<Value> {
			let mut text = String::new();
			input.read_to_string(&mut text)?;
			Ok(Box::new(text))
		}

		fn write(&self, output: &mut dyn Write, value: &dyn Any) -> Result<()> {
			let Some(text) = value.downcast_ref::<String>() else {
				bail!("expected a String");
			};
			output.write_all(text.as_bytes())?;
			Ok(())
		}
	}

	fn text_registry() -> Result<(Registry, Format), RegistryError> {
		let (mut registry, _) = png_registry()?;
		let txt = registry.add_format_with("text/plain", &[".txt"], &[b"#TXT".as_slice()])?;
		let text = Handler::new("text", Text);
		registry.add_reader(&txt, text.clone())?;
		registry.add_writer(&txt, text)?;
		Ok((registry, txt))
	}

	fn as_string(value: Value) -> String {
		*value.downcast::<String>().unwrap()
	}

	#[test]
	fn resolves_inferred_candidates() -> Result<(), RegistryError> {
		let (registry, png) = png_registry()?;
		let bus = registry.diagnostics();

		let plain = Resource::named("kitten.png").infer_from_name(&registry);
		assert_eq!(plain.resolve_format(bus)?, png);
		assert_eq!(plain.resolve_coding(bus), None);

		let gzipped = Resource::named("kitten.png.gz").infer_from_name(&registry);
		assert_eq!(gzipped.resolve_format(bus)?, png);
		assert_eq!(gzipped.resolve_coding(bus).map(|c| c.to_string()), Some("application/gzip".into()));
		Ok(())
	}

	#[test]
	fn unknown_format() -> Result<(), RegistryError> {
		let (registry, _) = png_registry()?;
		let resource = Resource::named("kitten.jpg").infer_from_name(&registry);
		let error = resource.resolve_format(registry.diagnostics()).unwrap_err();
		assert_eq!(error.kind(), ErrorKind::UnknownFormat);
		assert_eq!(
			error.to_string(),
			"unable to determine the format of 'kitten.jpg', specify it explicitly"
		);

		let unnamed = Resource::new().infer_from_name(&registry);
		assert!(unnamed.format_guesses().is_empty());
		Ok(())
	}

	#[test]
	fn specification_wins_over_inference() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		let raw = registry.add_format("application/octet-stream")?;
		let log = DiagnosticLog::attach(registry.diagnostics());

		let inferred = Resource::named("kitten.png.gz").infer_from_name(&registry);
		let specified = inferred.specify(raw.clone(), None);
		assert_eq!(specified.resolve_format(registry.diagnostics())?, raw);
		assert_eq!(specified.resolve_coding(registry.diagnostics()), None);

		// the original value is unchanged
		assert_eq!(inferred.specified_format(), None);
		assert_eq!(inferred.format_guesses(), &[png]);
		assert!(log.is_empty());
		Ok(())
	}

	#[test]
	fn ambiguous_guesses_warn() -> Result<(), RegistryError> {
		let mut registry = Registry::new();
		let a = registry.add_format_with("chemical/x-a", &[".mol"], &[])?;
		registry.add_format_with("chemical/x-b", &[".mol"], &[])?;
		let log = DiagnosticLog::attach(registry.diagnostics());

		let resource = Resource::named("benzene.mol").infer_from_name(&registry);
		assert_eq!(resource.resolve_format(registry.diagnostics())?, a);
		let entries = log.of_kinds(DiagnosticKind::AmbiguousFormat);
		assert_eq!(entries.len(), 1);
		assert_eq!(
			entries[0].to_string(),
			"format of 'benzene.mol' is ambiguous (chemical/x-a, chemical/x-b), using 'chemical/x-a'"
		);
		Ok(())
	}

	#[test]
	fn ambiguous_coding_warns() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		let compress = registry.add_coding_with("application/x-compress", &[".z"], &[])?;
		registry.add_coding_with("application/x-pack", &[".z"], &[])?;
		let log = DiagnosticLog::attach(registry.diagnostics());

		let resource = Resource::named("x.png.z").infer_from_name(&registry);
		assert_eq!(resource.resolve_format(registry.diagnostics())?, png);
		assert_eq!(resource.resolve_coding(registry.diagnostics()), Some(compress));

		let entries = log.of_kinds(DiagnosticKind::AmbiguousCoding);
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].candidates, vec!["application/x-compress", "application/x-pack"]);
		assert_eq!(entries[0].choice.as_deref(), Some("application/x-compress"));
		assert_eq!(
			entries[0].to_string(),
			"coding of 'x.png.z' is ambiguous (application/x-compress, application/x-pack), using 'application/x-compress'"
		);
		Ok(())
	}

	#[test]
	fn load_and_save_files() -> Result<()> {
		let (registry, _) = text_registry()?;
		let dir = TempDir::new()?;
		let file = dir.child("note.txt.br");
		let name = file.path().to_string_lossy().to_string();

		Resource::named(&name).save(&registry, &String::from("hello formatio"))?;
		let value = Resource::named(&name).load(&registry)?;
		assert_eq!(as_string(value), "hello formatio");
		Ok(())
	}

	#[test]
	fn load_falls_back_to_signatures() -> Result<()> {
		let (registry, _) = text_registry()?;
		let dir = TempDir::new()?;
		let file = dir.child("note.unknown");
		file.write_str("#TXT line")?;

		let value = Resource::named(&file.path().to_string_lossy()).load(&registry)?;
		assert_eq!(as_string(value), "#TXT line");
		Ok(())
	}

	#[test]
	fn load_from_unnamed_stream() -> Result<()> {
		let (registry, txt) = text_registry()?;
		let value = Resource::new().load_from(&registry, &b"#TXT from a pipe"[..])?;
		assert_eq!(as_string(value), "#TXT from a pipe");

		let error = Resource::new().load_from(&registry, &b"????"[..]).unwrap_err();
		let error = error.downcast_ref::<RegistryError>().map(RegistryError::kind);
		assert_eq!(error, Some(ErrorKind::UnknownFormat));

		let value = Resource::new()
			.specify(txt, None)
			.load_from(&registry, &b"????"[..])?;
		assert_eq!(as_string(value), "????");
		Ok(())
	}

	#[test]
	fn missing_file() -> Result<(), RegistryError> {
		let (registry, _) = text_registry()?;
		let error = Resource::named("/does/not/exist.txt").load(&registry).unwrap_err();
		assert!(error.to_string().starts_with("Failed to open"));
		assert!(Resource::new().save(&registry, &String::new()).is_err());
		Ok(())
	}
}
