use super::Registry;
use formatio_core::{
	RegistryError,
	codec::{Brotli, Gzip, Zstd},
};

impl Registry {
	/// Creates a registry that already knows the built-in codings and their codecs:
	/// gzip (`.gz`), brotli (`.br`) and zstd (`.zst`).
	pub fn with_builtins() -> Result<Self, RegistryError> {
		let mut registry = Self::new();
		registry.register_builtins()?;
		Ok(registry)
	}

	/// Registers the built-in codings into this registry.
	pub fn register_builtins(&mut self) -> Result<(), RegistryError> {
		// Gzip
		let gzip = self.add_coding_with(Gzip::CODING, &[Gzip::EXTENSION], &[Gzip::SIGNATURE])?;
		self.set_decoder(&gzip, Gzip)?;
		self.set_encoder(&gzip, Gzip)?;

		// Brotli streams have no magic number
		let brotli = self.add_coding_with(Brotli::CODING, &[Brotli::EXTENSION], &[])?;
		self.set_decoder(&brotli, Brotli)?;
		self.set_encoder(&brotli, Brotli)?;

		// Zstd
		let zstd = self.add_coding_with(Zstd::CODING, &[Zstd::EXTENSION], &[Zstd::SIGNATURE])?;
		self.set_decoder(&zstd, Zstd)?;
		self.set_encoder(&zstd, Zstd)?;

		Ok(())
	}
}
