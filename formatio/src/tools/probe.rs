use super::build_registry;
use anyhow::{Context, Result};
use clap::Args;
use formatio_core::DiagnosticLog;
use formatio_registry::{Registry, Resource};
use itertools::Itertools;
use std::{
	fmt::{Display, Write},
	fs::File,
	io::BufReader,
	path::PathBuf,
};

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// files you want to probe
	#[arg(required = true)]
	files: Vec<String>,

	/// YAML file with additional formats, codings and favorites
	#[arg(long, short)]
	config: Option<PathBuf>,

	/// only look at the file names, do not read the files
	#[arg(long)]
	no_content: bool,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let registry = build_registry(arguments.config.as_deref())?;
	let log = DiagnosticLog::attach(registry.diagnostics());
	for file in &arguments.files {
		print!("{}", probe(&registry, &log, file, !arguments.no_content)?);
	}
	Ok(())
}

/// Describes what inference and resolution make of one file, followed by the diagnostics
/// `log` collected meanwhile.
fn probe(registry: &Registry, log: &DiagnosticLog, file: &str, read_content: bool) -> Result<String> {
	log.take();
	let named = Resource::named(file);
	let mut out = String::new();
	writeln!(out, "{file}")?;

	let from_name = named.infer_from_name(registry);
	writeln!(out, "  name:    {}", describe(&from_name))?;

	let mut resource = from_name.clone();
	if read_content {
		let handle = File::open(file).with_context(|| format!("Failed to open {file:?}"))?;
		let from_content = named.infer_from_reader(registry, &mut BufReader::new(handle))?;
		writeln!(out, "  content: {}", describe(&from_content))?;
		if from_name.format_guesses().is_empty() && !is_empty(&from_content) {
			resource = from_content;
		}
	}

	let bus = registry.diagnostics();
	match resource.resolve_format(bus) {
		Ok(format) => writeln!(out, "  format:  {format}")?,
		Err(error) => writeln!(out, "  format:  unknown ({error})")?,
	}
	match resource.resolve_coding(bus) {
		Some(coding) => writeln!(out, "  coding:  {coding}")?,
		None => writeln!(out, "  coding:  none")?,
	}

	for diagnostic in log.take() {
		writeln!(out, "  note:    {diagnostic}")?;
	}
	Ok(out)
}

fn describe(resource: &Resource) -> String {
	format!(
		"formats [{}], codings [{}]",
		list(resource.format_guesses()),
		list(resource.coding_guesses())
	)
}

fn list<T: Display>(items: &[T]) -> String {
	if items.is_empty() {
		"-".to_string()
	} else {
		items.iter().join(", ")
	}
}

fn is_empty(resource: &Resource) -> bool {
	resource.format_guesses().is_empty() && resource.coding_guesses().is_empty()
}
