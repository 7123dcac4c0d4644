use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::codec::{decode_frame, pending_frame_size, FrameConfig, LENGTH_PREFIX_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally, so callers always get complete payloads.
/// A single read may pull in more than one frame; see
/// [`FrameReader::next_buffered`].
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame payload (blocking).
    ///
    /// Returns `Err(FrameError::Eof)` when the stream ends on a frame
    /// boundary and `Err(FrameError::Truncated)` when it ends mid-frame.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        loop {
            if let Some(payload) = self.next_buffered()? {
                return Ok(payload);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(self.closed_error());
            }

            trace!(read, buffered = self.buf.len() + read, "control channel read");
            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Decode a frame that is already fully buffered, without reading.
    ///
    /// Returns `Ok(None)` when the buffer holds no complete frame.
    pub fn next_buffered(&mut self) -> Result<Option<Bytes>> {
        decode_frame(&mut self.buf, self.config.max_payload_size)
    }

    fn closed_error(&self) -> FrameError {
        if self.buf.is_empty() {
            return FrameError::Eof;
        }
        FrameError::Truncated {
            needed: pending_frame_size(&self.buf).unwrap_or(LENGTH_PREFIX_SIZE),
            buffered: self.buf.len(),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::os::fd::OwnedFd;

    use bytes::{BufMut, BytesMut};
    use devport_transport::PortStream;

    use super::*;
    use crate::codec::encode_frame;

    fn wire(payloads: &[&[u8]]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        for payload in payloads {
            encode_frame(payload, &mut wire).unwrap();
        }
        wire.to_vec()
    }

    #[test]
    fn read_single_frame() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"hello"])));
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), b"hello");
    }

    #[test]
    fn read_multiple_frames() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"one", b"two", b"three"])));

        assert_eq!(reader.read_frame().unwrap().as_ref(), b"one");
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"two");
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"three");
        assert!(matches!(reader.read_frame(), Err(FrameError::Eof)));
    }

    #[test]
    fn next_buffered_drains_without_reading() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[b"a", b"b"])));

        assert_eq!(reader.read_frame().unwrap().as_ref(), b"a");
        // The first chunk read already pulled in the second frame.
        assert_eq!(reader.next_buffered().unwrap().unwrap().as_ref(), b"b");
        assert!(reader.next_buffered().unwrap().is_none());
    }

    #[test]
    fn read_frame_with_max_payload() {
        let payload = vec![0xAB; crate::MAX_PAYLOAD];
        let mut reader = FrameReader::new(Cursor::new(wire(&[&payload])));
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), payload.as_slice());
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: wire(&[b"slow"]),
            pos: 0,
        };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), b"slow");
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(err.is_eof());
    }

    #[test]
    fn truncated_length_prefix() {
        let mut reader = FrameReader::new(Cursor::new(vec![0x00]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated {
                needed: 2,
                buffered: 1
            }
        ));
    }

    #[test]
    fn connection_closed_mid_payload() {
        let mut partial = BytesMut::new();
        partial.put_u16(16);
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated {
                needed: 18,
                buffered: 11
            }
        ));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut wire = BytesMut::new();
        wire.put_u16(1024);

        let cfg = FrameConfig {
            max_payload_size: 16,
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    #[test]
    fn roundtrip_over_port_streams() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer =
            crate::writer::FrameWriter::new(PortStream::from_owned(OwnedFd::from(left), "out"));
        let mut reader = FrameReader::new(PortStream::from_owned(OwnedFd::from(right), "in"));

        writer.send(b"ping").unwrap();
        writer.send(b"").unwrap();

        assert_eq!(reader.read_frame().unwrap().as_ref(), b"ping");
        assert!(reader.read_frame().unwrap().is_empty());

        drop(writer);
        assert!(reader.read_frame().unwrap_err().is_eof());
    }

    #[test]
    fn read_error_propagates() {
        let mut framed = FrameReader::new(FailingReader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(wire(&[b"ok"])),
        };
        let mut framed = FrameReader::new(reader);
        assert_eq!(framed.read_frame().unwrap().as_ref(), b"ok");
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }
}
