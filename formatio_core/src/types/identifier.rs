//! Identifiers for formats and codings.
//!
//! Formats (e.g. `image/png`) and codings (e.g. `application/gzip`) share one identifier space
//! but live in disjoint namespaces. [`Format`] and [`Coding`] are separate types, so a value can
//! never be confused with the other kind once constructed; tables that hold both use the tagged
//! [`Identifier`] union.
//!
//! # Examples
//!
//! ```
//! use formatio_core::{Coding, Format, Identifier, Namespace};
//!
//! let png = Format::new("image/png").unwrap();
//! let gzip = Coding::new(" application/gzip ").unwrap();
//! assert_eq!(gzip.as_str(), "application/gzip");
//!
//! let id = Identifier::from(png.clone());
//! assert_eq!(id.namespace(), Namespace::Format);
//! assert_eq!(id.as_format(), Some(&png));
//! ```

use super::RegistryError;
use std::{
	fmt::{self, Debug, Display, Formatter},
	sync::Arc,
};

macro_rules! identifier_type {
	($(#[$meta:meta])* $name:ident, $namespace:expr) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		pub struct $name(Arc<str>);

		impl $name {
			/// Creates an identifier from `name`, ignoring surrounding whitespace.
			///
			/// Fails with [`RegistryError::InvalidIdentifier`] if nothing is left after trimming.
			pub fn new(name: &str) -> Result<Self, RegistryError> {
				let trimmed = name.trim();
				if trimmed.is_empty() {
					return Err(RegistryError::InvalidIdentifier(name.to_string()));
				}
				Ok(Self(Arc::from(trimmed)))
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}

			pub fn namespace(&self) -> Namespace {
				$namespace
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
				write!(f, "{}({:?})", stringify!($name), &*self.0)
			}
		}

		impl TryFrom<&str> for $name {
			type Error = RegistryError;

			fn try_from(value: &str) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

identifier_type!(
	/// Names a structured-data representation, e.g. `structure/x-pdb`.
	Format,
	Namespace::Format
);

identifier_type!(
	/// Names a transport transform layered on top of a format's bytes, e.g. `application/gzip`.
	Coding,
	Namespace::Coding
);

/// The two disjoint namespaces an identifier string can be claimed by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
	Format,
	Coding,
}

impl Namespace {
	pub fn as_str(&self) -> &str {
		match self {
			Namespace::Format => "format",
			Namespace::Coding => "coding",
		}
	}
}

impl Display for Namespace {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A format or a coding, as stored in extension and signature tables.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
	Format(Format),
	Coding(Coding),
}

impl Identifier {
	pub fn as_str(&self) -> &str {
		match self {
			Identifier::Format(format) => format.as_str(),
			Identifier::Coding(coding) => coding.as_str(),
		}
	}

	pub fn namespace(&self) -> Namespace {
		match self {
			Identifier::Format(_) => Namespace::Format,
			Identifier::Coding(_) => Namespace::Coding,
		}
	}

	pub fn as_format(&self) -> Option<&Format> {
		match self {
			Identifier::Format(format) => Some(format),
			Identifier::Coding(_) => None,
		}
	}

	pub fn as_coding(&self) -> Option<&Coding> {
		match self {
			Identifier::Format(_) => None,
			Identifier::Coding(coding) => Some(coding),
		}
	}
}

impl Display for Identifier {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<Format> for Identifier {
	fn from(format: Format) -> Self {
		Identifier::Format(format)
	}
}

impl From<Coding> for Identifier {
	fn from(coding: Coding) -> Self {
		Identifier::Coding(coding)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("image/png", "image/png")]
	#[case("  structure/x-pdb\t", "structure/x-pdb")]
	#[case("a", "a")]
	fn trims_names(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(Format::new(input).unwrap().as_str(), expected);
		assert_eq!(Coding::new(input).unwrap().as_str(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("   ")]
	fn rejects_empty_names(#[case] input: &str) {
		assert_eq!(
			Format::new(input).unwrap_err(),
			RegistryError::InvalidIdentifier(input.to_string())
		);
	}

	#[test]
	fn compares_by_value() {
		let a = Format::new("image/png").unwrap();
		let b = Format::try_from("image/png").unwrap();
		assert_eq!(a, b);
		assert_ne!(a, Format::new("image/jpeg").unwrap());
	}

	#[test]
	fn identifier_keeps_namespace() {
		let format = Identifier::from(Format::new("x").unwrap());
		let coding = Identifier::from(Coding::new("x").unwrap());
		assert_eq!(format.as_str(), coding.as_str());
		assert_ne!(format, coding);
		assert_eq!(format.namespace(), Namespace::Format);
		assert_eq!(coding.namespace(), Namespace::Coding);
		assert!(format.as_coding().is_none());
		assert!(coding.as_format().is_none());
	}

	#[test]
	fn formatting() {
		let format = Format::new("image/png").unwrap();
		assert_eq!(format.to_string(), "image/png");
		assert_eq!(format!("{format:?}"), "Format(\"image/png\")");
		assert_eq!(Namespace::Coding.to_string(), "coding");
	}
}
