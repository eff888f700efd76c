//! Reader/writer handlers.
//!
//! The registry never looks inside a handler: it only stores [`Handler`] tokens, compares them by
//! name and hands the chosen one back to the caller, who then invokes the [`FormatHandler`]
//! capability to actually read or write a value.

use anyhow::{Result, bail};
use std::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
	hash::{Hash, Hasher},
	io::{Read, Write},
	sync::Arc,
};

/// A decoded value. Its concrete type is known only to the handler that produced it.
pub type Value = Box<dyn Any + Send>;

/// Capability implemented by concrete format readers and writers.
///
/// Both methods have failing default implementations so a type can implement only one side.
pub trait FormatHandler: Send + Sync {
	fn read(&self, input: &mut dyn Read) -> Result<Value> {
		let _ = input;
		bail!("this handler does not support reading")
	}

	fn write(&self, output: &mut dyn Write, value: &dyn Any) -> Result<()> {
		let _ = (output, value);
		bail!("this handler does not support writing")
	}
}

/// An identity-comparable token for one reader or writer implementation.
///
/// Two handlers are the same handler if and only if they carry the same name.
#[derive(Clone)]
pub struct Handler {
	name: Arc<str>,
	inner: Arc<dyn FormatHandler>,
}

impl Handler {
	/// Wraps `handler` under `name`. The name is the handler's identity.
	pub fn new<H: FormatHandler + 'static>(name: &str, handler: H) -> Self {
		Self {
			name: Arc::from(name),
			inner: Arc::new(handler),
		}
	}

	/// Like [`new`](Self::new) for an implementation that is already shared.
	pub fn from_arc(name: &str, handler: Arc<dyn FormatHandler>) -> Self {
		Self {
			name: Arc::from(name),
			inner: handler,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Reads one value. Fails unless the wrapped implementation supports reading.
	pub fn read(&self, input: &mut dyn Read) -> Result<Value> {
		self.inner.read(input)
	}

	/// Writes `value`. Fails unless the wrapped implementation supports writing.
	pub fn write(&self, output: &mut dyn Write, value: &dyn Any) -> Result<()> {
		self.inner.write(output, value)
	}
}

impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for Handler {}

impl Hash for Handler {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl Debug for Handler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Handler({:?})", &*self.name)
	}
}

impl Display for Handler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// Which slot a handler occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
	Reader,
	Writer,
}

impl HandlerKind {
	pub fn as_str(&self) -> &str {
		match self {
			HandlerKind::Reader => "reader",
			HandlerKind::Writer => "writer",
		}
	}
}

impl Display for HandlerKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which slot a codec factory occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecKind {
	Decoder,
	Encoder,
}

impl CodecKind {
	pub fn as_str(&self) -> &str {
		match self {
			CodecKind::Decoder => "decoder",
			CodecKind::Encoder => "encoder",
		}
	}
}

impl Display for CodecKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	struct Upper;

	impl FormatHandler for Upper {
		fn read(&self, input: &mut dyn Read) -> Result<Value> {
			let mut text = String::new();
			input.read_to_string(&mut text)?;
			Ok(Box::new(text.to_uppercase()))
		}
	}

	#[test]
	fn identity_is_the_name() {
		let a = Handler::new("upper", Upper);
		let b = Handler::new("upper", Upper);
		let c = Handler::new("other", Upper);
		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(format!("{a:?}"), "Handler(\"upper\")");
		assert_eq!(a.to_string(), "upper");
	}

	#[test]
	fn delegates_to_the_capability() -> Result<()> {
		let handler = Handler::new("upper", Upper);
		let value = handler.read(&mut Cursor::new("abc"))?;
		assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("ABC"));
		Ok(())
	}

	#[test]
	fn missing_side_fails() {
		let handler = Handler::new("upper", Upper);
		let mut output = Vec::new();
		let error = handler.write(&mut output, &"abc").unwrap_err();
		assert_eq!(error.to_string(), "this handler does not support writing");
	}
}
