//! Non-fatal diagnostics.
//!
//! Ambiguities, overrides and replacements never abort an operation. They are reported as
//! [`Diagnostic`] values on a [`DiagnosticBus`], which forwards each one to the `log` facade and
//! to any subscribed listener. A [`DiagnosticLog`] collects them for later inspection.

mod bus;
mod collector;
mod diagnostic;

pub use bus::*;
pub use collector::*;
pub use diagnostic::*;
