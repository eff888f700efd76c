//! Format and coding registry with inference and resolution.
//!
//! Registrants describe what they know:
//! - formats and codings, with the filename extensions and leading-byte signatures that identify them
//! - reader and writer [`Handler`](formatio_core::Handler)s per format, plus favorites among them
//! - decoder and encoder factories per coding
//!
//! Callers then ask the [`Registry`] to infer candidates for a [`Resource`] and to resolve the single
//! format, coding, handler and codec to use. Conflicts never stop resolution: the first candidate in
//! registration order is used and a diagnostic is emitted on the registry's bus.

mod config;
mod inference;
mod registry;
mod resolution;
mod resource;
#[cfg(test)]
mod testing;

pub use config::*;
pub use inference::Candidates;
pub use registry::{Registry, RegistrySnapshot};
pub use resource::Resource;
