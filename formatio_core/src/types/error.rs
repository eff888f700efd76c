//! Error taxonomy for registration, inference and resolution.
//!
//! Every failure is fatal to the operation that raised it and is reported as a
//! [`RegistryError`]. Ambiguities are not errors; they travel through the
//! [`DiagnosticBus`](crate::DiagnosticBus) instead.

use super::{CodecKind, Coding, Format, HandlerKind, Namespace};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
	#[error("'{name}' is already registered as a {existing}, it cannot also be registered as a {requested}")]
	NamespaceConflict {
		name: String,
		existing: Namespace,
		requested: Namespace,
	},

	#[error("invalid identifier '{0}': identifiers must not be empty")]
	InvalidIdentifier(String),

	#[error("invalid extension '{0}': extensions must start with '.' followed by at least one character")]
	InvalidExtension(String),

	#[error("invalid signature: {0}")]
	InvalidSignature(String),

	#[error("{namespace} '{name}' is not registered")]
	UnknownIdentifier { name: String, namespace: Namespace },

	#[error("{kind} '{handler}' is already registered for format '{format}'")]
	DuplicateHandler {
		handler: String,
		format: Format,
		kind: HandlerKind,
	},

	#[error("{kind} '{handler}' is already a global favorite")]
	DuplicateFavorite { handler: String, kind: HandlerKind },

	#[error("unable to determine the format of '{resource}', specify it explicitly")]
	UnknownFormat { resource: String },

	#[error("no {kind} registered for format '{format}'")]
	NoHandlerRegistered { format: Format, kind: HandlerKind },

	#[error("no {kind} registered for coding '{coding}'")]
	NoCodecRegistered { coding: Coding, kind: CodecKind },

	#[error("conflicting global favorite {kind}s for format '{format}': {}", .handlers.join(", "))]
	ConflictingGlobalFavorites {
		format: Format,
		kind: HandlerKind,
		handlers: Vec<String>,
	},

	#[error("favorite {kind} '{handler}' is not registered for format '{format}'")]
	InvalidFavorite {
		handler: String,
		format: Format,
		kind: HandlerKind,
	},

	#[error("{kind} '{handler}' is not registered")]
	UnknownHandler { handler: String, kind: HandlerKind },
}

/// Fieldless mirror of [`RegistryError`] for matching on the kind of failure only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	NamespaceConflict,
	InvalidIdentifier,
	InvalidExtension,
	InvalidSignature,
	UnknownIdentifier,
	DuplicateHandler,
	DuplicateFavorite,
	UnknownFormat,
	NoHandlerRegistered,
	NoCodecRegistered,
	ConflictingGlobalFavorites,
	InvalidFavorite,
	UnknownHandler,
}

impl RegistryError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			RegistryError::NamespaceConflict { .. } => ErrorKind::NamespaceConflict,
			RegistryError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
			RegistryError::InvalidExtension(_) => ErrorKind::InvalidExtension,
			RegistryError::InvalidSignature(_) => ErrorKind::InvalidSignature,
			RegistryError::UnknownIdentifier { .. } => ErrorKind::UnknownIdentifier,
			RegistryError::DuplicateHandler { .. } => ErrorKind::DuplicateHandler,
			RegistryError::DuplicateFavorite { .. } => ErrorKind::DuplicateFavorite,
			RegistryError::UnknownFormat { .. } => ErrorKind::UnknownFormat,
			RegistryError::NoHandlerRegistered { .. } => ErrorKind::NoHandlerRegistered,
			RegistryError::NoCodecRegistered { .. } => ErrorKind::NoCodecRegistered,
			RegistryError::ConflictingGlobalFavorites { .. } => ErrorKind::ConflictingGlobalFavorites,
			RegistryError::InvalidFavorite { .. } => ErrorKind::InvalidFavorite,
			RegistryError::UnknownHandler { .. } => ErrorKind::UnknownHandler,
		}
	}
}
