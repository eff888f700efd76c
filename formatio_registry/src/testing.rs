//! Fixtures shared by the unit tests of this crate.

use crate::Registry;
use formatio_core::{Format, FormatHandler, Handler, RegistryError};

struct Stub;

impl FormatHandler for Stub {}

/// A handler that cannot read or write, for tests that only look at selection.
pub(crate) fn stub(name: &str) -> Handler {
	Handler::new(name, Stub)
}

/// The built-in codings plus `image/png` on `.png` with the PNG magic number.
pub(crate) fn png_registry() -> Result<(Registry, Format), RegistryError> {
	let mut registry = Registry::with_builtins()?;
	let png = registry.add_format_with("image/png", &[".png"], &[b"\x89PNG\r\n\x1a\n".as_slice()])?;
	Ok((registry, png))
}
