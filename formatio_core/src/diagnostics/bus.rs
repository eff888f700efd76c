use super::{Diagnostic, Severity};
use arc_swap::ArcSwap;
use std::sync::Arc;

type Listener = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Unique identifier for diagnostic listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Fan-out channel for [`Diagnostic`]s.
///
/// Every emitted diagnostic is logged through the `log` facade (info or warn, depending on its
/// severity) and then passed to each listener, synchronously and in subscription order.
/// Clones share the same listeners.
#[derive(Clone)]
pub struct DiagnosticBus {
	listeners: Arc<ArcSwap<Vec<Listener>>>,
}

impl DiagnosticBus {
	pub fn new() -> Self {
		Self {
			listeners: Arc::new(ArcSwap::from_pointee(Vec::new())),
		}
	}

	/// Register a listener that is called for every diagnostic emitted afterwards.
	pub fn subscribe<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&Diagnostic) + Send + Sync + 'static,
	{
		let listener: Listener = Arc::new(listener);
		let id = self.listeners.load().len();
		self.listeners.rcu(|old| {
			let mut new = (**old).clone();
			new.push(listener.clone());
			new
		});
		ListenerId(id)
	}

	/// Emit a diagnostic to the log and to all listeners.
	///
	/// A panicking listener does not prevent the remaining listeners from being called.
	pub fn emit(&self, diagnostic: Diagnostic) {
		match diagnostic.severity() {
			Severity::Info => log::info!("{diagnostic}"),
			Severity::Warning => log::warn!("{diagnostic}"),
		}

		let listeners = self.listeners.load();
		for listener in listeners.iter() {
			let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
				listener(&diagnostic);
			}));
		}
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.load().len()
	}
}

impl Default for DiagnosticBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for DiagnosticBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DiagnosticBus")
			.field("listeners", &self.listener_count())
			.finish()
	}
}
