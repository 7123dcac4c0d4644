//! Length-prefixed message framing for device port channels.
//!
//! Every message on the wire is:
//! - A 2-byte big-endian payload length
//! - Exactly that many payload bytes
//!
//! There is no magic number and no channel field, so a corrupted length can
//! not be recovered from. Callers get complete payloads or an error; no
//! partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, FrameConfig, LENGTH_PREFIX_SIZE, MAX_PAYLOAD};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
