use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use tracing::debug;

use crate::error::{Result, TransportError};

/// One direction of a port's control channel; implements Read + Write.
///
/// Reads and writes go straight to the descriptor. Nothing is buffered in
/// user space, so readiness reported by `poll(2)` always reflects bytes the
/// frame layer has not seen yet.
pub struct PortStream {
    inner: File,
    name: &'static str,
}

impl PortStream {
    /// Duplicate the process's standard input.
    pub fn stdin() -> Result<Self> {
        let fd = std::io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(|source| TransportError::Duplicate {
                stream: "stdin",
                source,
            })?;
        debug!(fd = fd.as_raw_fd(), "duplicated stdin for control channel");
        Ok(Self::from_owned(fd, "stdin"))
    }

    /// Duplicate the process's standard output.
    pub fn stdout() -> Result<Self> {
        let fd = std::io::stdout()
            .as_fd()
            .try_clone_to_owned()
            .map_err(|source| TransportError::Duplicate {
                stream: "stdout",
                source,
            })?;
        debug!(fd = fd.as_raw_fd(), "duplicated stdout for control channel");
        Ok(Self::from_owned(fd, "stdout"))
    }

    /// Wrap an already-owned descriptor (pipes, socket pairs in tests).
    pub fn from_owned(fd: OwnedFd, name: &'static str) -> Self {
        Self {
            inner: File::from(fd),
            name,
        }
    }

    /// Diagnostic name of this endpoint.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Read for PortStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for PortStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl AsFd for PortStream {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.as_fd()
    }
}

impl AsRawFd for PortStream {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

impl std::fmt::Debug for PortStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortStream")
            .field("name", &self.name)
            .field("fd", &self.inner.as_raw_fd())
            .finish()
    }
}
