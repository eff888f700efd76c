pub mod list;
pub mod probe;

use anyhow::{Context, Result};
use formatio_registry::{Registry, RegistryConfig};
use std::path::Path;

/// Well-known formats that the tool recognizes without any configuration.
const DEFAULT_FORMATS: &str = include_str!("default_formats.yml");

/// Builds the registry used by all subcommands: built-in codings, the default formats and, if
/// given, the user's configuration file on top.
pub fn build_registry(config: Option<&Path>) -> Result<Registry> {
	let mut registry = Registry::with_builtins()?;
	RegistryConfig::from_string(DEFAULT_FORMATS)
		.and_then(|defaults| defaults.apply(&mut registry))
		.context("Failed to load the default formats")?;

	if let Some(path) = config {
		log::debug!("applying config file {path:?}");
		RegistryConfig::from_path(path)?
			.apply(&mut registry)
			.with_context(|| format!("Failed to apply config file {path:?}"))?;
	}
	Ok(registry)
}
