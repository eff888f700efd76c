//! The `Registry` stores everything registrants contribute: known formats and codings, the
//! extension and signature associations used for inference, reader/writer handlers with their
//! favorites, and codec factories.
//!
//! Registrations are idempotent for repeated (identifier, association) pairs. Conflicts between
//! independent registrants are reported as diagnostics on the registry's [`DiagnosticBus`]; only
//! programming mistakes (namespace clashes, duplicate handlers, malformed keys) are errors.
//!
//! # Example
//!
//! ```rust
//! use formatio_core::{FormatHandler, Handler};
//! use formatio_registry::Registry;
//!
//! struct PngReader;
//! impl FormatHandler for PngReader {}
//!
//! let mut registry = Registry::with_builtins().unwrap();
//! let png = registry.add_format_with("image/png", &[".png"], &[b"\x89PNG".as_slice()]).unwrap();
//! registry.add_reader(&png, Handler::new("png-reader", PngReader)).unwrap();
//!
//! let candidates = registry.infer_from_name("kitten.png.gz");
//! assert_eq!(candidates.formats, vec![png.clone()]);
//! assert_eq!(candidates.codings[0].as_str(), "application/gzip");
//! assert_eq!(registry.resolve_reader(&png).unwrap().name(), "png-reader");
//! ```

mod builtins;
mod snapshot;

pub use snapshot::RegistrySnapshot;

use formatio_core::{
	Coding, CodecKind, DecoderFactory, Diagnostic, DiagnosticBus, DiagnosticKind, EncoderFactory, Extension, Format,
	Handler, HandlerKind, Identifier, Namespace, RegistryError, Signature,
};
use std::{
	collections::{BTreeMap, BTreeSet},
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

/// Handlers of one kind (readers or writers) together with their preferences.
#[derive(Clone, Default)]
pub(crate) struct HandlerTable {
	pub(crate) handlers: BTreeMap<Format, Vec<Handler>>,
	pub(crate) favorites: BTreeMap<Format, Handler>,
	pub(crate) global_favorites: Vec<Handler>,
}

impl HandlerTable {
	pub(crate) fn handlers(&self, format: &Format) -> &[Handler] {
		self.handlers.get(format).map(Vec::as_slice).unwrap_or(&[])
	}
}

#[derive(Clone, Default)]
pub(crate) struct Tables {
	pub(crate) formats: BTreeSet<Format>,
	pub(crate) codings: BTreeSet<Coding>,
	pub(crate) extensions: BTreeMap<Extension, Vec<Identifier>>,
	/// In registration order, so signature inference is deterministic.
	pub(crate) signatures: Vec<(Signature, Vec<Identifier>)>,
	pub(crate) readers: HandlerTable,
	pub(crate) writers: HandlerTable,
	pub(crate) decoders: BTreeMap<Coding, Arc<dyn DecoderFactory>>,
	pub(crate) encoders: BTreeMap<Coding, Arc<dyn EncoderFactory>>,
}

impl Tables {
	pub(crate) fn handler_table(&self, kind: HandlerKind) -> &HandlerTable {
		match kind {
			HandlerKind::Reader => &self.readers,
			HandlerKind::Writer => &self.writers,
		}
	}

	fn handler_table_mut(&mut self, kind: HandlerKind) -> &mut HandlerTable {
		match kind {
			HandlerKind::Reader => &mut self.readers,
			HandlerKind::Writer => &mut self.writers,
		}
	}
}

/// Registry of formats, codings, inference keys, handlers and codecs.
///
/// Not synchronized: populate it during a single-threaded setup phase, then share it read-only.
#[derive(Default)]
pub struct Registry {
	tables: Tables,
	diagnostics: DiagnosticBus,
}

impl Registry {
	/// Creates an empty registry with its own diagnostic bus.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry that reports to `diagnostics`.
	pub fn with_diagnostics(diagnostics: DiagnosticBus) -> Self {
		Self {
			tables: Tables::default(),
			diagnostics,
		}
	}

	/// The bus every registration and resolution diagnostic is emitted on.
	pub fn diagnostics(&self) -> &DiagnosticBus {
		&self.diagnostics
	}

	pub(crate) fn tables(&self) -> &Tables {
		&self.tables
	}

	// ---------------------------------------------------------------------
	// identifiers
	// ---------------------------------------------------------------------

	/// Registers a format. Registering a known format again is a no-op.
	///
	/// # Arguments
	///
	/// * `name` - The media type, e.g. `"image/png"`. Surrounding whitespace is trimmed.
	///
	/// # Returns
	///
	/// * `Ok(Format)` for the registered format.
	/// * `Err(RegistryError::InvalidIdentifier)` if `name` is blank.
	/// * `Err(RegistryError::NamespaceConflict)` if `name` is already registered as a coding.
	pub fn add_format(&mut self, name: &str) -> Result<Format, RegistryError> {
		let format = Format::new(name)?;
		if self.tables.codings.contains(&Coding::new(format.as_str())?) {
			return Err(RegistryError::NamespaceConflict {
				name: format.to_string(),
				existing: Namespace::Coding,
				requested: Namespace::Format,
			});
		}
		if self.tables.formats.insert(format.clone()) {
			log::debug!("registered format '{format}'");
		}
		Ok(format)
	}

	/// Registers a coding. Registering a known coding again is a no-op.
	///
	/// # Errors
	///
	/// * [`RegistryError::InvalidIdentifier`] if `name` is blank.
	/// * [`RegistryError::NamespaceConflict`] if `name` is already registered as a format.
	pub fn add_coding(&mut self, name: &str) -> Result<Coding, RegistryError> {
		let coding = Coding::new(name)?;
		if self.tables.formats.contains(&Format::new(coding.as_str())?) {
			return Err(RegistryError::NamespaceConflict {
				name: coding.to_string(),
				existing: Namespace::Format,
				requested: Namespace::Coding,
			});
		}
		if self.tables.codings.insert(coding.clone()) {
			log::debug!("registered coding '{coding}'");
		}
		Ok(coding)
	}

	/// Registers a format and binds the given extensions and signatures to it.
	pub fn add_format_with(
		&mut self,
		name: &str,
		extensions: &[&str],
		signatures: &[&[u8]],
	) -> Result<Format, RegistryError> {
		let format = self.add_format(name)?;
		for extension in extensions {
			self.add_extension(extension, format.clone())?;
		}
		for signature in signatures {
			self.add_signature(signature, format.clone())?;
		}
		Ok(format)
	}

	/// Registers a coding and binds the given extensions and signatures to it.
	pub fn add_coding_with(
		&mut self,
		name: &str,
		extensions: &[&str],
		signatures: &[&[u8]],
	) -> Result<Coding, RegistryError> {
		let coding = self.add_coding(name)?;
		for extension in extensions {
			self.add_extension(extension, coding.clone())?;
		}
		for signature in signatures {
			self.add_signature(signature, coding.clone())?;
		}
		Ok(coding)
	}

	pub fn is_format(&self, format: &Format) -> bool {
		self.tables.formats.contains(format)
	}

	pub fn is_coding(&self, coding: &Coding) -> bool {
		self.tables.codings.contains(coding)
	}

	/// Looks up a registered identifier by name in either namespace.
	pub fn identifier(&self, name: &str) -> Option<Identifier> {
		let format = Format::new(name).ok()?;
		if self.tables.formats.contains(&format) {
			return Some(Identifier::Format(format));
		}
		let coding = Coding::new(name).ok()?;
		self
			.tables
			.codings
			.contains(&coding)
			.then_some(Identifier::Coding(coding))
	}

	/// Registered formats, sorted by name.
	pub fn formats(&self) -> impl Iterator<Item = &Format> {
		self.tables.formats.iter()
	}

	/// Registered codings, sorted by name.
	pub fn codings(&self) -> impl Iterator<Item = &Coding> {
		self.tables.codings.iter()
	}

	/// Whether `identifier` is registered in its namespace.
	pub fn contains(&self, identifier: &Identifier) -> bool {
		match identifier {
			Identifier::Format(format) => self.is_format(format),
			Identifier::Coding(coding) => self.is_coding(coding),
		}
	}

	fn ensure_registered(&self, identifier: &Identifier) -> Result<(), RegistryError> {
		if self.contains(identifier) {
			Ok(())
		} else {
			Err(RegistryError::UnknownIdentifier {
				name: identifier.to_string(),
				namespace: identifier.namespace(),
			})
		}
	}

	// ---------------------------------------------------------------------
	// extensions and signatures
	// ---------------------------------------------------------------------

	/// Binds a filename extension (e.g. `".gro"`) to a registered format or coding.
	///
	/// Emits [`DiagnosticKind::AmbiguousExtension`] when the extension ends up bound to more than one identifier.
	///
	/// # Errors
	///
	/// * [`RegistryError::InvalidExtension`], see [`Extension::parse`].
	/// * [`RegistryError::UnknownIdentifier`] if `identifier` was never registered.
	pub fn add_extension(&mut self, extension: &str, identifier: impl Into<Identifier>) -> Result<(), RegistryError> {
		let extension = Extension::parse(extension)?;
		let identifier = identifier.into();
		self.ensure_registered(&identifier)?;

		let bound = self.tables.extensions.entry(extension.clone()).or_default();
		if !push_unique(bound, identifier) {
			return Ok(());
		}
		log::debug!("bound extension '{extension}' to {}", bound.last().map_or("", |i| i.as_str()));
		if bound.len() > 1 {
			let diagnostic = Diagnostic::new(DiagnosticKind::AmbiguousExtension, &extension)
				.with_candidates(bound.iter())
				.with_choice(&bound[0]);
			self.diagnostics.emit(diagnostic);
		}
		Ok(())
	}

	/// Binds a leading-byte signature to a registered format or coding.
	///
	/// Emits [`DiagnosticKind::AmbiguousSignature`] when the signature ends up bound to more than one identifier.
	///
	/// # Errors
	///
	/// * [`RegistryError::InvalidSignature`] if `signature` is empty or longer than 512 bytes.
	/// * [`RegistryError::UnknownIdentifier`] if `identifier` was never registered.
	pub fn add_signature(&mut self, signature: &[u8], identifier: impl Into<Identifier>) -> Result<(), RegistryError> {
		let signature = Signature::new(signature)?;
		let identifier = identifier.into();
		self.ensure_registered(&identifier)?;

		let signatures = &mut self.tables.signatures;
		let index = match signatures.iter().position(|(s, _)| *s == signature) {
			Some(index) => index,
			None => {
				signatures.push((signature.clone(), Vec::new()));
				signatures.len() - 1
			}
		};
		let bound = &mut signatures[index].1;
		if !push_unique(bound, identifier) {
			return Ok(());
		}
		log::debug!("bound signature [{signature}] to {}", bound.last().map_or("", |i| i.as_str()));
		if bound.len() > 1 {
			let diagnostic = Diagnostic::new(DiagnosticKind::AmbiguousSignature, &signature)
				.with_candidates(bound.iter())
				.with_choice(&bound[0]);
			self.diagnostics.emit(diagnostic);
		}
		Ok(())
	}

	/// Identifiers bound to `extension`, in registration order.
	pub fn lookup_extension(&self, extension: &Extension) -> &[Identifier] {
		self.tables.extensions.get(extension).map(Vec::as_slice).unwrap_or(&[])
	}

	/// All extension bindings, sorted by extension.
	pub fn extensions(&self) -> impl Iterator<Item = (&Extension, &[Identifier])> {
		self.tables.extensions.iter().map(|(e, ids)| (e, ids.as_slice()))
	}

	/// All signature bindings, in registration order.
	pub fn signatures(&self) -> impl Iterator<Item = (&Signature, &[Identifier])> {
		self.tables.signatures.iter().map(|(s, ids)| (s, ids.as_slice()))
	}

	// ---------------------------------------------------------------------
	// handlers
	// ---------------------------------------------------------------------

	/// Adds a reader for `format`. See [`add_handler`](Self::add_handler).
	pub fn add_reader(&mut self, format: &Format, handler: Handler) -> Result<(), RegistryError> {
		self.add_handler(HandlerKind::Reader, format, handler)
	}

	/// Adds a writer for `format`. See [`add_handler`](Self::add_handler).
	pub fn add_writer(&mut self, format: &Format, handler: Handler) -> Result<(), RegistryError> {
		self.add_handler(HandlerKind::Writer, format, handler)
	}

	/// Adds a reader or writer for `format`.
	///
	/// Adding the same handler twice fails with [`RegistryError::DuplicateHandler`]. A further,
	/// distinct handler is accepted and reported as [`DiagnosticKind::AdditionalReader`] or
	/// [`DiagnosticKind::AdditionalWriter`].
	///
	/// # Arguments
	///
	/// * `kind` - Whether `handler` reads or writes.
	/// * `format` - A registered format.
	/// * `handler` - The handler, identified by its name.
	///
	/// # Errors
	///
	/// * [`RegistryError::UnknownIdentifier`] if `format` was never registered.
	/// * [`RegistryError::DuplicateHandler`] if `handler` is already registered for `format`.
	pub fn add_handler(&mut self, kind: HandlerKind, format: &Format, handler: Handler) -> Result<(), RegistryError> {
		self.ensure_registered(&Identifier::Format(format.clone()))?;

		let handlers = self
			.tables
			.handler_table_mut(kind)
			.handlers
			.entry(format.clone())
			.or_default();
		if handlers.contains(&handler) {
			return Err(RegistryError::DuplicateHandler {
				handler: handler.name().to_string(),
				format: format.clone(),
				kind,
			});
		}
		log::debug!("added {kind} '{handler}' for format '{format}'");
		handlers.push(handler);

		if handlers.len() > 1 {
			let diagnostic =
				Diagnostic::new(DiagnosticKind::additional_handler(kind), format).with_candidates(handlers.iter());
			self.diagnostics.emit(diagnostic);
		}
		Ok(())
	}

	/// Readers or writers registered for `format`, in registration order.
	pub fn handlers(&self, kind: HandlerKind, format: &Format) -> &[Handler] {
		self.tables.handler_table(kind).handlers(format)
	}

	/// Readers registered for `format`, in registration order.
	pub fn readers(&self, format: &Format) -> &[Handler] {
		self.handlers(HandlerKind::Reader, format)
	}

	pub fn writers(&self, format: &Format) -> &[Handler] {
		self.handlers(HandlerKind::Writer, format)
	}

	/// Finds a registered handler by name, for any format.
	pub fn find_handler(&self, kind: HandlerKind, name: &str) -> Option<&Handler> {
		self
			.tables
			.handler_table(kind)
			.handlers
			.values()
			.flatten()
			.find(|handler| handler.name() == name)
	}

	// ---------------------------------------------------------------------
	// favorites
	// ---------------------------------------------------------------------

	/// See [`set_favorite`](Self::set_favorite).
	pub fn set_favorite_reader(&mut self, format: &Format, handler: &Handler) -> Result<(), RegistryError> {
		self.set_favorite(HandlerKind::Reader, format, handler)
	}

	/// See [`set_favorite`](Self::set_favorite).
	pub fn set_favorite_writer(&mut self, format: &Format, handler: &Handler) -> Result<(), RegistryError> {
		self.set_favorite(HandlerKind::Writer, format, handler)
	}

	/// Declares the preferred handler for one format, replacing a previous favorite.
	///
	/// # Errors
	///
	/// * [`RegistryError::InvalidFavorite`] if `handler` is not registered for `format`.
	pub fn set_favorite(&mut self, kind: HandlerKind, format: &Format, handler: &Handler) -> Result<(), RegistryError> {
		let table = self.tables.handler_table_mut(kind);
		if !table.handlers(format).contains(handler) {
			return Err(RegistryError::InvalidFavorite {
				handler: handler.name().to_string(),
				format: format.clone(),
				kind,
			});
		}
		if let Some(previous) = table.favorites.insert(format.clone(), handler.clone()) {
			if previous != *handler {
				log::debug!("favorite {kind} of '{format}' changed from '{previous}' to '{handler}'");
			}
		}
		Ok(())
	}

	pub fn add_global_favorite_reader(&mut self, handler: &Handler) -> Result<(), RegistryError> {
		self.add_global_favorite(HandlerKind::Reader, handler)
	}

	pub fn add_global_favorite_writer(&mut self, handler: &Handler) -> Result<(), RegistryError> {
		self.add_global_favorite(HandlerKind::Writer, handler)
	}

	/// Declares a handler preferred for every format it services.
	///
	/// A global favorite beats the per-format favorite, see [`resolve_handler`](Self::resolve_handler).
	///
	/// # Errors
	///
	/// * [`RegistryError::DuplicateFavorite`] if `handler` already is a global favorite of this kind.
	pub fn add_global_favorite(&mut self, kind: HandlerKind, handler: &Handler) -> Result<(), RegistryError> {
		let globals = &mut self.tables.handler_table_mut(kind).global_favorites;
		if globals.contains(handler) {
			return Err(RegistryError::DuplicateFavorite {
				handler: handler.name().to_string(),
				kind,
			});
		}
		log::debug!("added global favorite {kind} '{handler}'");
		globals.push(handler.clone());
		Ok(())
	}

	/// The per-format favorite, if one was declared.
	pub fn favorite(&self, kind: HandlerKind, format: &Format) -> Option<&Handler> {
		self.tables.handler_table(kind).favorites.get(format)
	}

	pub fn global_favorites(&self, kind: HandlerKind) -> &[Handler] {
		&self.tables.handler_table(kind).global_favorites
	}

	// ---------------------------------------------------------------------
	// codecs
	// ---------------------------------------------------------------------

	/// Sets the single decoder of `coding`, replacing (with a diagnostic) any previous one.
	pub fn set_decoder<D: DecoderFactory + 'static>(&mut self, coding: &Coding, decoder: D) -> Result<(), RegistryError> {
		self.set_decoder_arc(coding, Arc::new(decoder))
	}

	/// Sets the single encoder of `coding`, replacing (with a diagnostic) any previous one.
	pub fn set_encoder<E: EncoderFactory + 'static>(&mut self, coding: &Coding, encoder: E) -> Result<(), RegistryError> {
		self.set_encoder_arc(coding, Arc::new(encoder))
	}

	/// Like [`set_decoder`](Self::set_decoder) for a factory that is already shared.
	///
	/// Emits [`DiagnosticKind::DecoderReplaced`] when `coding` had a decoder before.
	///
	/// # Errors
	///
	/// * [`RegistryError::UnknownIdentifier`] if `coding` was never registered.
	pub fn set_decoder_arc(&mut self, coding: &Coding, decoder: Arc<dyn DecoderFactory>) -> Result<(), RegistryError> {
		self.ensure_registered(&Identifier::Coding(coding.clone()))?;
		if self.tables.decoders.insert(coding.clone(), decoder).is_some() {
			self.emit_codec_replaced(CodecKind::Decoder, coding);
		}
		Ok(())
	}

	/// Like [`set_encoder`](Self::set_encoder) for a factory that is already shared.
	///
	/// Emits [`DiagnosticKind::EncoderReplaced`] when `coding` had an encoder before.
	///
	/// # Errors
	///
	/// * [`RegistryError::UnknownIdentifier`] if `coding` was never registered.
	pub fn set_encoder_arc(&mut self, coding: &Coding, encoder: Arc<dyn EncoderFactory>) -> Result<(), RegistryError> {
		self.ensure_registered(&Identifier::Coding(coding.clone()))?;
		if self.tables.encoders.insert(coding.clone(), encoder).is_some() {
			self.emit_codec_replaced(CodecKind::Encoder, coding);
		}
		Ok(())
	}

	fn emit_codec_replaced(&self, kind: CodecKind, coding: &Coding) {
		let kind = match kind {
			CodecKind::Decoder => DiagnosticKind::DecoderReplaced,
			CodecKind::Encoder => DiagnosticKind::EncoderReplaced,
		};
		self.diagnostics.emit(Diagnostic::new(kind, coding));
	}

	pub fn has_codec(&self, kind: CodecKind, coding: &Coding) -> bool {
		match kind {
			CodecKind::Decoder => self.tables.decoders.contains_key(coding),
			CodecKind::Encoder => self.tables.encoders.contains_key(coding),
		}
	}
}

impl Debug for Registry {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("formats", &self.tables.formats)
			.field("codings", &self.tables.codings)
			.field("extensions", &self.tables.extensions.len())
			.field("signatures", &self.tables.signatures.len())
			.finish_non_exhaustive()
	}
}

/// Appends `identifier` unless already present. Returns whether it was appended.
fn push_unique(list: &mut Vec<Identifier>, identifier: Identifier) -> bool {
	if list.contains(&identifier) {
		false
	} else {
		list.push(identifier);
		true
	}
}
