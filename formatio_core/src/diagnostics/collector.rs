use super::{Diagnostic, DiagnosticBus, DiagnosticKind};
use enumset::EnumSet;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every diagnostic emitted on the bus it is attached to.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLog {
	entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl DiagnosticLog {
	pub fn attach(bus: &DiagnosticBus) -> Self {
		let log = Self::default();
		let entries = log.entries.clone();
		bus.subscribe(move |diagnostic| entries.lock().push(diagnostic.clone()));
		log
	}

	pub fn entries(&self) -> Vec<Diagnostic> {
		self.entries.lock().clone()
	}

	/// Returns the recorded diagnostics whose kind is in `kinds`.
	pub fn of_kinds(&self, kinds: impl Into<EnumSet<DiagnosticKind>>) -> Vec<Diagnostic> {
		let kinds = kinds.into();
		self
			.entries
			.lock()
			.iter()
			.filter(|d| kinds.contains(d.kind))
			.cloned()
			.collect()
	}

	/// Removes and returns everything recorded so far.
	pub fn take(&self) -> Vec<Diagnostic> {
		std::mem::take(&mut *self.entries.lock())
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}
