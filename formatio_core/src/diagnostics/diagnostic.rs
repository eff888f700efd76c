use crate::HandlerKind;
use enumset::EnumSetType;
use std::fmt::{self, Display, Formatter};

/// What kind of conflict a [`Diagnostic`] reports.
#[derive(Debug, EnumSetType, Hash)]
pub enum DiagnosticKind {
	/// An extension is bound to more than one identifier.
	AmbiguousExtension,
	/// A byte signature is bound to more than one identifier.
	AmbiguousSignature,
	/// A format gained a second (or further) reader.
	AdditionalReader,
	/// A format gained a second (or further) writer.
	AdditionalWriter,
	/// A coding's decoder was replaced.
	DecoderReplaced,
	/// A coding's encoder was replaced.
	EncoderReplaced,
	/// Inference produced several format candidates; the first one was used.
	AmbiguousFormat,
	/// Inference produced several coding candidates; the first one was used.
	AmbiguousCoding,
	/// Several readers service a format and no favorite narrows them down.
	AmbiguousReader,
	/// Several writers service a format and no favorite narrows them down.
	AmbiguousWriter,
	/// A global favorite took precedence over a per-format favorite.
	FavoriteOverridden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
	Info,
	Warning,
}

impl DiagnosticKind {
	pub fn severity(&self) -> Severity {
		match self {
			DiagnosticKind::AdditionalReader | DiagnosticKind::AdditionalWriter => Severity::Info,
			_ => Severity::Warning,
		}
	}

	pub fn additional_handler(kind: HandlerKind) -> Self {
		match kind {
			HandlerKind::Reader => DiagnosticKind::AdditionalReader,
			HandlerKind::Writer => DiagnosticKind::AdditionalWriter,
		}
	}

	pub fn ambiguous_handler(kind: HandlerKind) -> Self {
		match kind {
			HandlerKind::Reader => DiagnosticKind::AmbiguousReader,
			HandlerKind::Writer => DiagnosticKind::AmbiguousWriter,
		}
	}
}

/// A structured, non-fatal report: which subject is affected, which candidates were in play and
/// what was chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
	pub kind: DiagnosticKind,
	/// The identifier, extension or signature concerned.
	pub subject: String,
	pub candidates: Vec<String>,
	pub choice: Option<String>,
}

impl Diagnostic {
	pub fn new(kind: DiagnosticKind, subject: impl ToString) -> Self {
		Self {
			kind,
			subject: subject.to_string(),
			candidates: Vec::new(),
			choice: None,
		}
	}

	#[must_use]
	pub fn with_candidates<I, T>(mut self, candidates: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: ToString,
	{
		self.candidates = candidates.into_iter().map(|c| c.to_string()).collect();
		self
	}

	#[must_use]
	pub fn with_choice(mut self, choice: impl ToString) -> Self {
		self.choice = Some(choice.to_string());
		self
	}

	pub fn severity(&self) -> Severity {
		self.kind.severity()
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let subject = &self.subject;
		let candidates = self.candidates.join(", ");
		let choice = self.choice.as_deref().unwrap_or("?");
		match self.kind {
			DiagnosticKind::AmbiguousExtension => {
				write!(f, "extension '{subject}' is claimed by several identifiers: {candidates}")
			}
			DiagnosticKind::AmbiguousSignature => {
				write!(f, "signature [{subject}] is claimed by several identifiers: {candidates}")
			}
			DiagnosticKind::AdditionalReader => write!(f, "format '{subject}' now has several readers: {candidates}"),
			DiagnosticKind::AdditionalWriter => write!(f, "format '{subject}' now has several writers: {candidates}"),
			DiagnosticKind::DecoderReplaced => write!(f, "the decoder of coding '{subject}' was replaced"),
			DiagnosticKind::EncoderReplaced => write!(f, "the encoder of coding '{subject}' was replaced"),
			DiagnosticKind::AmbiguousFormat => {
				write!(f, "format of '{subject}' is ambiguous ({candidates}), using '{choice}'")
			}
			DiagnosticKind::AmbiguousCoding => {
				write!(f, "coding of '{subject}' is ambiguous ({candidates}), using '{choice}'")
			}
			DiagnosticKind::AmbiguousReader => {
				write!(f, "several readers for format '{subject}' ({candidates}), using '{choice}'")
			}
			DiagnosticKind::AmbiguousWriter => {
				write!(f, "several writers for format '{subject}' ({candidates}), using '{choice}'")
			}
			DiagnosticKind::FavoriteOverridden => write!(
				f,
				"global favorite '{choice}' overrides the favorite '{candidates}' of format '{subject}'"
			),
		}
	}
}
