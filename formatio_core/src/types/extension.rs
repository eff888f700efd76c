//! Normalized filename extensions.
//!
//! An [`Extension`] always starts with a `.`, has at least one character after it and is stored
//! lowercase, so `.PNG` and `.png` address the same table entry. Names are split one extension at a
//! time, so compound keys like `.tar.gz` are rejected: register `.tar` as a format and `.gz` as a
//! coding instead.
//!
//! ```
//! use formatio_core::Extension;
//!
//! let (base, ext) = Extension::split_name("data/kitten.png.GZ").unwrap();
//! assert_eq!(base, "data/kitten.png");
//! assert_eq!(ext.as_str(), ".gz");
//! ```

use super::RegistryError;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Extension(String);

impl Extension {
	/// Parses and normalizes an extension such as `".gro"`.
	///
	/// # Errors
	/// [`RegistryError::InvalidExtension`] if `ext` does not start with `.`, has nothing after the
	/// dot, or contains a further `.` or a path separator.
	pub fn parse(ext: &str) -> Result<Self, RegistryError> {
		let trimmed = ext.trim();
		match trimmed.strip_prefix('.') {
			Some(rest) if !rest.is_empty() && !rest.contains(['.', '/', '\\']) => Ok(Self(trimmed.to_lowercase())),
			_ => Err(RegistryError::InvalidExtension(ext.to_string())),
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Splits the last extension off `name`.
	///
	/// Only the final path component is inspected. A leading dot (as in `.bashrc`) or a trailing
	/// dot does not count as an extension. Returns the remaining name and the normalized extension.
	pub fn split_name(name: &str) -> Option<(&str, Extension)> {
		let file_start = name.rfind(['/', '\\']).map_or(0, |index| index + 1);
		let index = name[file_start..].rfind('.')? + file_start;
		if index == file_start {
			return None;
		}
		let extension = Extension::parse(&name[index..]).ok()?;
		Some((&name[..index], extension))
	}
}

impl Display for Extension {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<&str> for Extension {
	type Error = RegistryError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
