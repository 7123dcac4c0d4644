use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::{I2cError, I2cResult};

/// Largest single read, matching the kernel's `I2C_SMBUS_BLOCK_MAX`.
pub const I2C_BLOCK_MAX: usize = 32;

mod ioctl {
    // `I2C_SLAVE` from <linux/i2c-dev.h>: a bare request number taking the
    // address by value.
    nix::ioctl_write_int_bad!(i2c_set_slave, 0x0703);
}

/// An i2c-dev descriptor bound to one slave address.
///
/// Reads and writes are single raw transfers: a transfer that moves fewer
/// bytes than asked is a failure, never partial data. The device type is
/// generic so the transfer rules hold for any byte stream.
#[derive(Debug)]
pub struct I2cDevice<T = File> {
    device: T,
    address: u16,
    path: PathBuf,
}

impl I2cDevice<File> {
    /// Open `path` read-write and bind it to `address`.
    pub fn open(path: impl AsRef<Path>, address: u16) -> I2cResult<Self> {
        let path = path.as_ref();
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| I2cError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        // SAFETY: `device` is an open descriptor owned by this function for
        // the duration of the call; I2C_SLAVE takes the address by value and
        // does not retain any pointer.
        unsafe { ioctl::i2c_set_slave(device.as_raw_fd(), nix::libc::c_int::from(address)) }
            .map_err(|errno| I2cError::SetAddress {
                address,
                source: errno.into(),
            })?;

        info!(?path, address = format_args!("0x{address:02x}"), "i2c device bound");
        Ok(Self {
            device,
            address,
            path: path.to_path_buf(),
        })
    }
}

impl<T: Read + Write> I2cDevice<T> {
    /// Wrap an already-bound device.
    pub fn from_device(device: T, address: u16, path: impl Into<PathBuf>) -> Self {
        Self {
            device,
            address,
            path: path.into(),
        }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `data` in one transfer.
    pub fn write(&mut self, data: &[u8]) -> I2cResult<()> {
        let written = self.device.write(data).map_err(|source| I2cError::Io {
            op: "write",
            address: self.address,
            source,
        })?;
        if written != data.len() {
            warn!(
                address = format_args!("0x{:02x}", self.address),
                expected = data.len(),
                written,
                "short i2c write"
            );
            return Err(I2cError::ShortWrite {
                expected: data.len(),
                actual: written,
            });
        }
        debug!(len = data.len(), "i2c write");
        Ok(())
    }

    /// Read exactly `len` bytes in one transfer.
    ///
    /// `len` above [`I2C_BLOCK_MAX`] fails with [`I2cError::ReadTooLong`]
    /// before the device is touched.
    pub fn read(&mut self, len: usize) -> I2cResult<Bytes> {
        if len > I2C_BLOCK_MAX {
            return Err(I2cError::ReadTooLong {
                len,
                max: I2C_BLOCK_MAX,
            });
        }

        let mut buf = [0u8; I2C_BLOCK_MAX];
        let read = self
            .device
            .read(&mut buf[..len])
            .map_err(|source| I2cError::Io {
                op: "read",
                address: self.address,
                source,
            })?;
        if read != len {
            warn!(
                address = format_args!("0x{:02x}", self.address),
                expected = len,
                read,
                "short i2c read"
            );
            return Err(I2cError::ShortRead {
                expected: len,
                actual: read,
            });
        }
        debug!(len, "i2c read");
        Ok(Bytes::copy_from_slice(&buf[..len]))
    }
}
