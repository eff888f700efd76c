use super::build_registry;
use anyhow::Result;
use clap::Args;
use formatio_core::Identifier;
use formatio_registry::Registry;
use itertools::Itertools;
use std::{collections::BTreeMap, fmt::Write, path::PathBuf};

#[derive(Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// YAML file with additional formats, codings and favorites
	#[arg(long, short)]
	config: Option<PathBuf>,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let registry = build_registry(arguments.config.as_deref())?;
	print!("{}", list(&registry)?);
	Ok(())
}

#[derive(Default)]
struct Keys {
	extensions: Vec<String>,
	signatures: Vec<String>,
}

fn list(registry: &Registry) -> Result<String> {
	let mut keys: BTreeMap<Identifier, Keys> = BTreeMap::new();
	for (extension, identifiers) in registry.extensions() {
		for identifier in identifiers {
			keys.entry(identifier.clone()).or_default().extensions.push(extension.to_string());
		}
	}
	for (signature, identifiers) in registry.signatures() {
		for identifier in identifiers {
			keys.entry(identifier.clone()).or_default().signatures.push(format!("[{signature}]"));
		}
	}

	let mut out = String::new();
	let sections = [
		("formats", registry.formats().cloned().map(Identifier::from).collect::<Vec<_>>()),
		("codings", registry.codings().cloned().map(Identifier::from).collect()),
	];
	for (title, identifiers) in sections {
		writeln!(out, "{title}:")?;
		for identifier in identifiers {
			write!(out, "  {identifier}")?;
			if let Some(keys) = keys.get(&identifier) {
				if !keys.extensions.is_empty() {
					write!(out, "  extensions: {}", keys.extensions.iter().join(" "))?;
				}
				if !keys.signatures.is_empty() {
					write!(out, "  signatures: {}", keys.signatures.iter().join(" "))?;
				}
			}
			writeln!(out)?;
		}
	}
	Ok(out)
}
