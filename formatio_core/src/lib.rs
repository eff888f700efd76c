//! Building blocks shared by every formatio crate.
//!
//! - [`types`]: format and coding identifiers, extensions, byte signatures, handlers and the error taxonomy
//! - [`codec`]: decoder/encoder factories plus the built-in gzip, brotli and zstd codecs
//! - [`diagnostics`]: the non-fatal warning channel used by registration and resolution
//! - [`io`]: bounded prefix reading that never disturbs the underlying stream

pub mod codec;
pub mod diagnostics;
pub mod io;
pub mod types;

pub use codec::{DecoderFactory, EncoderFactory, EncodingWriter};
pub use diagnostics::*;
pub use types::*;
