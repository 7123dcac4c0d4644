use std::io::{self, ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_frame, FrameConfig, LENGTH_PREFIX_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` stream.
///
/// Prefix and payload go out as one contiguous buffer, so a reader never
/// sees a length without its payload unless the stream itself fails. Every
/// frame is flushed before `send` returns: the peer is waiting on it.
pub struct FrameWriter<T> {
    inner: T,
    scratch: BytesMut,
    max_payload: usize,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            scratch: BytesMut::new(),
            max_payload: config.max_payload_size,
        }
    }

    /// Frame `payload`, write it out and flush (blocking).
    ///
    /// Nothing reaches the stream when the payload is over the limit.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.max_payload,
            });
        }

        self.scratch.clear();
        encode_frame(payload, &mut self.scratch)?;

        let sink = &mut self.inner;
        let mut pending: &[u8] = &self.scratch;
        while !pending.is_empty() {
            match retry_transient(|| sink.write(pending))? {
                0 => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                n => pending = &pending[n..],
            }
        }
        retry_transient(|| sink.flush())?;

        trace!(len = payload.len() + LENGTH_PREFIX_SIZE, "frame sent");
        Ok(())
    }
}

/// Re-run `op` while it fails with `Interrupted` or `WouldBlock`.
fn retry_transient<R>(mut op: impl FnMut() -> io::Result<R>) -> io::Result<R> {
    loop {
        match op() {
            Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            outcome => return outcome,
        }
    }
}
