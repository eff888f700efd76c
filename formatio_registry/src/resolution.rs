//! Selection of the single effective handler or codec.
//!
//! Handler resolution for a format, in order of precedence:
//! 1. the one global favorite that services the format (two or more is an error),
//! 2. the per-format favorite,
//! 3. the first handler in registration order, with a diagnostic when there are several.

use crate::Registry;
use formatio_core::{
	CodecKind, Coding, DecoderFactory, Diagnostic, DiagnosticBus, DiagnosticKind, EncoderFactory, Format, Handler,
	HandlerKind, RegistryError,
};
use std::{fmt::Display, sync::Arc};

impl Registry {
	/// The reader to use for `format`. See [`resolve_handler`](Self::resolve_handler).
	pub fn resolve_reader(&self, format: &Format) -> Result<&Handler, RegistryError> {
		self.resolve_handler(HandlerKind::Reader, format)
	}

	/// The writer to use for `format`. See [`resolve_handler`](Self::resolve_handler).
	pub fn resolve_writer(&self, format: &Format) -> Result<&Handler, RegistryError> {
		self.resolve_handler(HandlerKind::Writer, format)
	}

	/// Picks the reader or writer to use for `format`.
	///
	/// An applicable global favorite wins and emits [`DiagnosticKind::FavoriteOverridden`] if the
	/// format also has a favorite of its own. Next comes the per-format favorite, then the first
	/// registered handler, emitting [`DiagnosticKind::AmbiguousReader`] or
	/// [`DiagnosticKind::AmbiguousWriter`] when there are several.
	///
	/// # Arguments
	///
	/// * `kind` - Reader or writer.
	/// * `format` - The format to service.
	///
	/// # Returns
	///
	/// * `Ok(&Handler)` for the selected handler.
	/// * `Err(RegistryError::NoHandlerRegistered)` if `format` has no handler of this kind.
	/// * `Err(RegistryError::ConflictingGlobalFavorites)` if more than one global favorite applies.
	/// * `Err(RegistryError::InvalidFavorite)` if the per-format favorite is no longer registered.
	pub fn resolve_handler(&self, kind: HandlerKind, format: &Format) -> Result<&Handler, RegistryError> {
		let table = self.tables().handler_table(kind);
		let candidates = table.handlers(format);
		if candidates.is_empty() {
			return Err(RegistryError::NoHandlerRegistered {
				format: format.clone(),
				kind,
			});
		}

		let globals: Vec<&Handler> = table
			.global_favorites
			.iter()
			.filter(|handler| candidates.contains(*handler))
			.collect();
		let favorite = table.favorites.get(format);

		match globals.as_slice() {
			[] => {}
			[global] => {
				if let Some(favorite) = favorite {
					let diagnostic = Diagnostic::new(DiagnosticKind::FavoriteOverridden, format)
						.with_candidates([favorite])
						.with_choice(global);
					self.diagnostics().emit(diagnostic);
				}
				log::debug!("resolved {kind} '{global}' for '{format}' (global favorite)");
				return Ok(*global);
			}
			_ => {
				return Err(RegistryError::ConflictingGlobalFavorites {
					format: format.clone(),
					kind,
					handlers: globals.iter().map(|h| h.name().to_string()).collect(),
				});
			}
		}

		if let Some(favorite) = favorite {
			if !candidates.contains(favorite) {
				return Err(RegistryError::InvalidFavorite {
					handler: favorite.name().to_string(),
					format: format.clone(),
					kind,
				});
			}
			log::debug!("resolved {kind} '{favorite}' for '{format}' (favorite)");
			return Ok(favorite);
		}

		let handler = first_guess(
			candidates,
			format,
			DiagnosticKind::ambiguous_handler(kind),
			self.diagnostics(),
		)
		.ok_or_else(|| RegistryError::NoHandlerRegistered {
			format: format.clone(),
			kind,
		})?;
		log::debug!("resolved {kind} '{handler}' for '{format}'");
		Ok(handler)
	}

	/// The decoder of `coding`.
	///
	/// # Errors
	///
	/// * [`RegistryError::NoCodecRegistered`] if `coding` has no decoder.
	pub fn resolve_decoder(&self, coding: &Coding) -> Result<Arc<dyn DecoderFactory>, RegistryError> {
		self
			.tables()
			.decoders
			.get(coding)
			.cloned()
			.ok_or_else(|| RegistryError::NoCodecRegistered {
				coding: coding.clone(),
				kind: CodecKind::Decoder,
			})
	}

	/// The encoder of `coding`.
	///
	/// # Errors
	///
	/// * [`RegistryError::NoCodecRegistered`] if `coding` has no encoder.
	pub fn resolve_encoder(&self, coding: &Coding) -> Result<Arc<dyn EncoderFactory>, RegistryError> {
		self
			.tables()
			.encoders
			.get(coding)
			.cloned()
			.ok_or_else(|| RegistryError::NoCodecRegistered {
				coding: coding.clone(),
				kind: CodecKind::Encoder,
			})
	}
}

/// Returns the first candidate. With more than one, emits `kind` naming all of them.
pub(crate) fn first_guess<'a, T: Display>(
	candidates: &'a [T],
	subject: impl Display,
	kind: DiagnosticKind,
	bus: &DiagnosticBus,
) -> Option<&'a T> {
	let first = candidates.first()?;
	if candidates.len() > 1 {
		bus.emit(
			Diagnostic::new(kind, subject)
				.with_candidates(candidates)
				.with_choice(first),
		);
	}
	Some(first)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{png_registry, stub};
	use formatio_core::{Blob, DiagnosticLog, ErrorKind, codec};
	use pretty_assertions::assert_eq;

	#[test]
	fn no_handler_registered() -> Result<(), RegistryError> {
		let (registry, png) = png_registry()?;
		let error = registry.resolve_reader(&png).unwrap_err();
		assert_eq!(error.kind(), ErrorKind::NoHandlerRegistered);
		assert_eq!(error.to_string(), "no reader registered for format 'image/png'");
		Ok(())
	}

	#[test]
	fn single_handler_without_diagnostics() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		registry.add_writer(&png, stub("png-writer"))?;
		let log = DiagnosticLog::attach(registry.diagnostics());
		assert_eq!(registry.resolve_writer(&png)?.name(), "png-writer");
		assert!(log.is_empty());
		Ok(())
	}

	#[test]
	fn reader_precedence() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		let (a, b) = (stub("png-a"), stub("png-b"));
		registry.add_reader(&png, a.clone())?;
		registry.add_reader(&png, b.clone())?;
		let log = DiagnosticLog::attach(registry.diagnostics());

		// first registered wins, with a warning
		assert_eq!(registry.resolve_reader(&png)?, &a);
		let ambiguous = log.take();
		assert_eq!(ambiguous.len(), 1);
		assert_eq!(ambiguous[0].kind, DiagnosticKind::AmbiguousReader);
		assert_eq!(ambiguous[0].candidates, vec!["png-a", "png-b"]);
		assert_eq!(ambiguous[0].choice.as_deref(), Some("png-a"));

		// per-format favorite
		registry.set_favorite_reader(&png, &b)?;
		assert_eq!(registry.resolve_reader(&png)?, &b);
		assert!(log.is_empty());

		// global favorite overrides the per-format favorite
		registry.add_global_favorite_reader(&a)?;
		assert_eq!(registry.resolve_reader(&png)?, &a);
		let overridden = log.take();
		assert_eq!(overridden.len(), 1);
		assert_eq!(overridden[0].kind, DiagnosticKind::FavoriteOverridden);
		assert_eq!(overridden[0].choice.as_deref(), Some("png-a"));

		// two applicable global favorites
		registry.add_global_favorite_reader(&b)?;
		let error = registry.resolve_reader(&png).unwrap_err();
		assert_eq!(
			error,
			RegistryError::ConflictingGlobalFavorites {
				format: png.clone(),
				kind: HandlerKind::Reader,
				handlers: vec!["png-a".into(), "png-b".into()],
			}
		);

		// writers are resolved from their own table
		registry.add_writer(&png, stub("png-w1"))?;
		registry.add_writer(&png, stub("png-w2"))?;
		log.take();
		assert_eq!(registry.resolve_writer(&png)?.name(), "png-w1");
		let ambiguous = log.take();
		assert_eq!(ambiguous.len(), 1);
		assert_eq!(ambiguous[0].kind, DiagnosticKind::AmbiguousWriter);
		assert_eq!(ambiguous[0].candidates, vec!["png-w1", "png-w2"]);
		assert_eq!(ambiguous[0].choice.as_deref(), Some("png-w1"));
		Ok(())
	}

	#[test]
	fn global_favorite_only_applies_where_registered() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		let gif = registry.add_format_with("image/gif", &[".gif"], &[])?;
		let universal = stub("universal");
		registry.add_reader(&gif, universal.clone())?;
		registry.add_reader(&png, stub("png-only"))?;
		registry.add_global_favorite_reader(&universal)?;

		assert_eq!(registry.resolve_reader(&png)?.name(), "png-only");
		assert_eq!(registry.resolve_reader(&gif)?.name(), "universal");
		Ok(())
	}

	#[test]
	fn global_favorite_reports_any_format_favorite() -> Result<(), RegistryError> {
		let (mut registry, png) = png_registry()?;
		let a = stub("png-a");
		registry.add_reader(&png, a.clone())?;
		registry.add_reader(&png, stub("png-b"))?;
		registry.set_favorite_reader(&png, &a)?;
		registry.add_global_favorite_reader(&a)?;

		let log = DiagnosticLog::attach(registry.diagnostics());
		assert_eq!(registry.resolve_reader(&png)?, &a);
		let entries = log.take();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].kind, DiagnosticKind::FavoriteOverridden);
		assert_eq!(entries[0].candidates, vec!["png-a"]);
		assert_eq!(entries[0].choice.as_deref(), Some("png-a"));
		Ok(())
	}

	#[test]
	fn codecs() -> anyhow::Result<()> {
		let (mut registry, _) = png_registry()?;
		let gzip = registry.add_coding("application/gzip")?;
		let encoded = codec::encode_blob(&Blob::from("kitten"), registry.resolve_encoder(&gzip)?.as_ref())?;
		let decoded = codec::decode_blob(&encoded, registry.resolve_decoder(&gzip)?.as_ref())?;
		assert_eq!(decoded.as_str(), "kitten");

		let lzma = registry.add_coding("application/x-lzma")?;
		let error = registry.resolve_decoder(&lzma).err().map(|e| e.to_string());
		assert_eq!(
			error.as_deref(),
			Some("no decoder registered for coding 'application/x-lzma'")
		);
		assert!(registry.resolve_encoder(&lzma).is_err());
		Ok(())
	}

	#[test]
	fn first_guess_reports_ambiguity() {
		let bus = DiagnosticBus::new();
		let log = DiagnosticLog::attach(&bus);
		let none: [&str; 0] = [];
		assert_eq!(first_guess(&none, "x", DiagnosticKind::AmbiguousFormat, &bus), None);
		assert_eq!(first_guess(&["a"], "x", DiagnosticKind::AmbiguousFormat, &bus), Some(&"a"));
		assert!(log.is_empty());
		assert_eq!(first_guess(&["a", "b"], "x", DiagnosticKind::AmbiguousFormat, &bus), Some(&"a"));
		assert_eq!(log.entries()[0].to_string(), "format of 'x' is ambiguous (a, b), using 'a'");
	}
}
