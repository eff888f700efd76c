//! Leading-byte signatures ("magic numbers").

use super::RegistryError;
use itertools::Itertools;
use std::fmt::{self, Display, Formatter};

/// Longest signature that can be registered, and therefore the longest prefix ever read for inference.
pub const MAX_SIGNATURE_LENGTH: usize = 512;

/// A non-empty byte sequence of at most [`MAX_SIGNATURE_LENGTH`] bytes, matched at offset 0.
///
/// ```
/// use formatio_core::Signature;
///
/// let gzip = Signature::from_hex("1f 8b").unwrap();
/// assert!(gzip.matches(&[0x1f, 0x8b, 0x08]));
/// assert!(!gzip.matches(&[0x1f]));
/// assert_eq!(gzip.to_string(), "1f 8b");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature(Vec<u8>);

impl Signature {
	/// Creates a signature from raw bytes.
	///
	/// # Errors
	///
	/// * [`RegistryError::InvalidSignature`] if `bytes` is empty or longer than 512 bytes.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, RegistryError> {
		let bytes = bytes.into();
		if bytes.is_empty() {
			return Err(RegistryError::InvalidSignature("signature is empty".to_string()));
		}
		if bytes.len() > MAX_SIGNATURE_LENGTH {
			return Err(RegistryError::InvalidSignature(format!(
				"signature has {} bytes, at most {MAX_SIGNATURE_LENGTH} are allowed",
				bytes.len()
			)));
		}
		Ok(Self(bytes))
	}

	/// Parses hexadecimal text like `"89 50 4E 47"` or `"89504e47"`. Whitespace is ignored.
	pub fn from_hex(text: &str) -> Result<Self, RegistryError> {
		let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
		if digits.len() % 2 != 0 {
			return Err(RegistryError::InvalidSignature(format!(
				"'{text}' has an odd number of hex digits"
			)));
		}
		let bytes = digits
			.chunks(2)
			.map(|pair| {
				let pair: String = pair.iter().collect();
				if !pair.chars().all(|c| c.is_ascii_hexdigit()) {
					return Err(RegistryError::InvalidSignature(format!("'{text}' is not valid hex")));
				}
				u8::from_str_radix(&pair, 16)
					.map_err(|e| RegistryError::InvalidSignature(format!("'{text}' is not valid hex: {e}")))
			})
			.collect::<Result<Vec<u8>, _>>()?;
		Self::new(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Number of bytes, between 1 and 512.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always `false`, signatures are never empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether `prefix` starts with this signature.
	pub fn matches(&self, prefix: &[u8]) -> bool {
		prefix.starts_with(&self.0)
	}
}

impl Display for Signature {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{:02x}", self.0.iter().format(" "))
	}
}
