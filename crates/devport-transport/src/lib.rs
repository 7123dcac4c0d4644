//! Control channel plumbing for device port processes.
//!
//! A port process talks to its controller over its own standard input and
//! output. This crate provides:
//! - [`PortStream`], an unbuffered `Read`/`Write` endpoint over a duplicated
//!   stdio descriptor (the std stdio handles buffer internally, which would
//!   hide pending bytes from `poll(2)`)
//! - [`wait_ready`], the single blocking wait that multiplexes the control
//!   channel with an optional priority (interrupt) source
//!
//! This is the lowest layer of devport. Everything else builds on top of it.

pub mod error;
pub mod poll;
pub mod stream;

pub use error::{Result, TransportError};
pub use poll::{wait_ready, Readiness};
pub use stream::PortStream;
