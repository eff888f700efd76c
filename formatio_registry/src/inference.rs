//! Candidate inference from file names and leading bytes.
//!
//! Both forms of inference return every matching identifier in registration order, split into
//! format and coding candidates. Whenever a format and a coding match at the same level, the
//! coding candidates are dropped: a format claim always takes precedence.

use crate::Registry;
use anyhow::{Context, Result};
use formatio_core::{
	Coding, Extension, Format, Identifier,
	io::{PREFIX_LENGTH, peek_prefix},
};
use std::io::{Read, Seek};

/// Format and coding candidates produced by inference, in registration order.
///
/// Duplicates are kept: their number and order feed the ambiguity diagnostics and the
/// first-guess tie-break of resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidates {
	pub formats: Vec<Format>,
	pub codings: Vec<Coding>,
}

impl Candidates {
	pub fn is_empty(&self) -> bool {
		self.formats.is_empty() && self.codings.is_empty()
	}

	fn push(&mut self, identifier: &Identifier) {
		match identifier {
			Identifier::Format(format) => self.formats.push(format.clone()),
			Identifier::Coding(coding) => self.codings.push(coding.clone()),
		}
	}

	fn apply_exclusivity(&mut self) {
		if !self.formats.is_empty() && !self.codings.is_empty() {
			log::debug!(
				"dropping coding candidates {:?} in favor of format candidates {:?}",
				self.codings,
				self.formats
			);
			self.codings.clear();
		}
	}
}

impl Registry {
	/// Infers candidates from a file name such as `kitten.png.gz`.
	///
	/// When the last extension names a coding, the extension before it is looked up as well, but
	/// only for formats: at most one coding layer is peeled.
	pub fn infer_from_name(&self, name: &str) -> Candidates {
		let mut candidates = Candidates::default();
		let Some((base, extension)) = Extension::split_name(name) else {
			return candidates;
		};

		for identifier in self.lookup_extension(&extension) {
			candidates.push(identifier);
		}
		candidates.apply_exclusivity();

		if !candidates.codings.is_empty() {
			if let Some((_, inner)) = Extension::split_name(base) {
				let formats = self.lookup_extension(&inner).iter().filter_map(Identifier::as_format);
				candidates.formats.extend(formats.cloned());
			}
		}

		log::debug!("inferred {candidates:?} from name '{name}'");
		candidates
	}

	/// Infers candidates from the leading bytes of a resource.
	///
	/// Only the first [`PREFIX_LENGTH`] bytes are considered. A signature longer than the prefix
	/// never matches.
	pub fn infer_from_bytes(&self, prefix: &[u8]) -> Candidates {
		let prefix = &prefix[..prefix.len().min(PREFIX_LENGTH)];
		let mut candidates = Candidates::default();
		for (signature, identifiers) in self.signatures() {
			if signature.matches(prefix) {
				identifiers.iter().for_each(|identifier| candidates.push(identifier));
			}
		}
		candidates.apply_exclusivity();
		log::debug!("inferred {candidates:?} from {} leading bytes", prefix.len());
		candidates
	}

	/// Peeks at the leading bytes of `reader` and infers from them. The stream position is restored.
	pub fn infer_from_reader<R: Read + Seek>(&self, reader: &mut R) -> Result<Candidates> {
		let prefix = peek_prefix(reader).context("Failed to peek at the stream for signature inference")?;
		Ok(self.infer_from_bytes(&prefix))
	}
}
