//! External term format codec for device port payloads.
//!
//! Each frame payload is one term: a version byte (131) followed by a
//! tagged value. Only the subset the device protocol uses is supported:
//! atoms, integers, binaries, tuples and references. Anything else is a
//! [`TermError`], and the caller is expected to treat it as fatal.

pub mod decode;
pub mod encode;
pub mod error;
pub mod tag;
pub mod term;

pub use decode::decode;
pub use encode::{encode, MAX_ATOM_CHARS};
pub use error::{Result, TermError};
pub use term::{Creation, Reference, Term};
