use super::{Registry, Tables};
use formatio_core::{HandlerKind, RegistryError};
use std::sync::Arc;

/// A frozen copy of a registry's contents, see [`Registry::snapshot`].
///
/// Handlers and codec factories are shared with the registry they were taken from.
#[derive(Clone)]
pub struct RegistrySnapshot(Tables);

impl RegistrySnapshot {
	pub fn format_count(&self) -> usize {
		self.0.formats.len()
	}

	pub fn coding_count(&self) -> usize {
		self.0.codings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.formats.is_empty() && self.0.codings.is_empty()
	}
}

impl std::fmt::Debug for RegistrySnapshot {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistrySnapshot")
			.field("formats", &self.0.formats)
			.field("codings", &self.0.codings)
			.finish_non_exhaustive()
	}
}

impl Registry {
	/// Removes every registration. The diagnostic bus and its listeners are kept.
	pub fn clear(&mut self) {
		log::debug!("clearing registry");
		self.tables = Tables::default();
	}

	pub fn snapshot(&self) -> RegistrySnapshot {
		RegistrySnapshot(self.tables.clone())
	}

	/// Replaces the contents of this registry with `snapshot`.
	pub fn restore(&mut self, snapshot: RegistrySnapshot) {
		self.tables = snapshot.0;
	}

	/// Adds everything in `snapshot` to this registry.
	///
	/// The usual registration rules apply, so ambiguities are reported and namespace clashes
	/// fail. Handlers and global favorites that are already present are skipped.
	pub fn merge(&mut self, snapshot: &RegistrySnapshot) -> Result<(), RegistryError> {
		let tables = &snapshot.0;

		for format in &tables.formats {
			self.add_format(format.as_str())?;
		}
		for coding in &tables.codings {
			self.add_coding(coding.as_str())?;
		}
		for (extension, identifiers) in &tables.extensions {
			for identifier in identifiers {
				self.add_extension(extension.as_str(), identifier.clone())?;
			}
		}
		for (signature, identifiers) in &tables.signatures {
			for identifier in identifiers {
				self.add_signature(signature.as_bytes(), identifier.clone())?;
			}
		}

		for kind in [HandlerKind::Reader, HandlerKind::Writer] {
			let table = tables.handler_table(kind);
			for (format, handlers) in &table.handlers {
				for handler in handlers {
					if !self.handlers(kind, format).contains(handler) {
						self.add_handler(kind, format, handler.clone())?;
					}
				}
			}
			for (format, handler) in &table.favorites {
				self.set_favorite(kind, format, handler)?;
			}
			for handler in &table.global_favorites {
				if !self.global_favorites(kind).contains(handler) {
					self.add_global_favorite(kind, handler)?;
				}
			}
		}

		for (coding, decoder) in &tables.decoders {
			let same = self.tables.decoders.get(coding).is_some_and(|d| Arc::ptr_eq(d, decoder));
			if !same {
				self.set_decoder_arc(coding, decoder.clone())?;
			}
		}
		for (coding, encoder) in &tables.encoders {
			let same = self.tables.encoders.get(coding).is_some_and(|e| Arc::ptr_eq(e, encoder));
			if !same {
				self.set_encoder_arc(coding, encoder.clone())?;
			}
		}

		log::debug!(
			"merged snapshot with {} formats and {} codings",
			tables.formats.len(),
			tables.codings.len()
		);
		Ok(())
	}

	/// Runs `f` against an emptied registry, then puts the previous contents back.
	///
	/// Whatever `f` registers is discarded afterwards; its return value is passed through. The
	/// previous contents come back through [`restore`](Self::restore) rather than
	/// [`merge`](Self::merge): the result is the same as clearing and merging the snapshot, but no
	/// registration diagnostics are emitted a second time. They also come back when `f` panics.
	pub fn isolated<T>(&mut self, f: impl FnOnce(&mut Registry) -> T) -> T {
		let saved = self.snapshot();
		self.clear();
		let mut guard = RestoreOnDrop {
			registry: self,
			saved: Some(saved),
		};
		f(&mut *guard.registry)
	}
}

/// Puts a snapshot back into its registry when dropped, also while unwinding.
struct RestoreOnDrop<'a> {
	registry: &'a mut Registry,
	saved: Option<RegistrySnapshot>,
}

impl Drop for RestoreOnDrop<'_> {
	fn drop(&mut self) {
		if let Some(saved) = self.saved.take() {
			self.registry.restore(saved);
		}
	}
}
