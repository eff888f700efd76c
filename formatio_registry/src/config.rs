//! Declarative registry configuration in YAML.
//!
//! ```yaml
//! formats:
//!   - name: image/png
//!     extensions: [.png]
//!     signatures: ["89 50 4e 47"]
//! codings:
//!   - name: application/x-lzip
//!     extensions: [.lz]
//!     signatures: ["4c 5a 49 50"]
//! favorites:
//!   readers: { image/png: png-fast }
//! global_favorites:
//!   writers: [png-fast]
//! ```
//!
//! Handlers cannot be described in a file. Favorites therefore name handlers that the program
//! registered before applying the configuration.

use crate::Registry;
use anyhow::{Context, Result};
use formatio_core::{Format, Handler, HandlerKind, Identifier, RegistryError, Signature};
use serde::Deserialize;
use std::{
	collections::BTreeMap,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
	/// Formats to register, with their extensions and signatures
	#[serde(default)]
	pub formats: Vec<IdentifierConfig>,

	/// Codings to register, with their extensions and signatures
	#[serde(default)]
	pub codings: Vec<IdentifierConfig>,

	/// Per-format favorite handlers, by format name
	#[serde(default)]
	pub favorites: FavoritesConfig,

	/// Handlers preferred for every format they service
	#[serde(default)]
	pub global_favorites: GlobalFavoritesConfig,
}

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IdentifierConfig {
	pub name: String,

	#[serde(default)]
	pub extensions: Vec<String>,

	/// Hexadecimal byte strings, whitespace is ignored
	#[serde(default)]
	pub signatures: Vec<String>,
}

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FavoritesConfig {
	#[serde(default)]
	pub readers: BTreeMap<String, String>,

	#[serde(default)]
	pub writers: BTreeMap<String, String>,
}

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GlobalFavoritesConfig {
	#[serde(default)]
	pub readers: Vec<String>,

	#[serde(default)]
	pub writers: Vec<String>,
}

impl RegistryConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a YAML config file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("Failed to open config file {path:?}"))?;
		Self::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse config file {path:?}"))
	}

	/// Registers all formats and codings, then declares the favorites.
	pub fn apply(&self, registry: &mut Registry) -> Result<()> {
		for entry in &self.formats {
			let format = registry.add_format(&entry.name)?;
			entry
				.bind(registry, format.into())
				.with_context(|| format!("Failed to configure format '{}'", entry.name))?;
		}
		for entry in &self.codings {
			let coding = registry.add_coding(&entry.name)?;
			entry
				.bind(registry, coding.into())
				.with_context(|| format!("Failed to configure coding '{}'", entry.name))?;
		}

		for (kind, favorites) in [
			(HandlerKind::Reader, &self.favorites.readers),
			(HandlerKind::Writer, &self.favorites.writers),
		] {
			for (format, handler) in favorites {
				let format = Format::new(format)?;
				let handler = lookup_handler(registry, kind, handler)?;
				registry.set_favorite(kind, &format, &handler)?;
			}
		}

		for (kind, globals) in [
			(HandlerKind::Reader, &self.global_favorites.readers),
			(HandlerKind::Writer, &self.global_favorites.writers),
		] {
			for handler in globals {
				let handler = lookup_handler(registry, kind, handler)?;
				registry.add_global_favorite(kind, &handler)?;
			}
		}

		log::debug!(
			"applied config with {} formats and {} codings",
			self.formats.len(),
			self.codings.len()
		);
		Ok(())
	}
}

impl IdentifierConfig {
	fn bind(&self, registry: &mut Registry, identifier: Identifier) -> Result<(), RegistryError> {
		for extension in &self.extensions {
			registry.add_extension(extension, identifier.clone())?;
		}
		for signature in &self.signatures {
			let signature = Signature::from_hex(signature)?;
			registry.add_signature(signature.as_bytes(), identifier.clone())?;
		}
		Ok(())
	}
}

fn lookup_handler(registry: &Registry, kind: HandlerKind, name: &str) -> Result<Handler, RegistryError> {
	registry
		.find_handler(kind, name)
		.cloned()
		.ok_or_else(|| RegistryError::UnknownHandler {
			handler: name.to_string(),
			kind,
		})
}
