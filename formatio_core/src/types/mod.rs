mod blob;
mod error;
mod extension;
mod handler;
mod identifier;
mod signature;

pub use blob::*;
pub use error::*;
pub use extension::*;
pub use handler::*;
pub use identifier::*;
pub use signature::*;
