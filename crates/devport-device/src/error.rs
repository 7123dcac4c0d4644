use std::path::PathBuf;

use crate::gpio::PinState;

/// Errors from the GPIO controller.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// The operation needs an open pin.
    #[error("pin is not open")]
    NotOpen,

    /// Writing needs an output pin.
    #[error("pin is not an output (state {0:?})")]
    NotOutput(PinState),

    /// Interrupts can only be armed on an input pin.
    #[error("pin is not an input (state {0:?})")]
    NotInput(PinState),

    /// `init` named a direction other than `input` or `output`.
    #[error("unknown gpio direction {0:?}")]
    UnknownDirection(String),

    /// `set_int` named an edge mode sysfs doesn't have.
    #[error("unknown interrupt mode {0:?}")]
    UnknownEdgeMode(String),

    /// Writing the pin number to the export file failed.
    #[error("failed to export gpio {pin}: {source}")]
    Export { pin: u32, source: std::io::Error },

    /// The direction file exists but could not be written.
    #[error("failed to set direction via {path}: {source}")]
    Direction {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The value file could not be opened.
    #[error("failed to open {path}: {source}")]
    OpenValue {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The edge file could not be written.
    #[error("failed to set edge via {path}: {source}")]
    Edge {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A positioned read/write on the value file failed outright.
    #[error("gpio value {op} failed: {source}")]
    ValueIo {
        op: &'static str,
        source: std::io::Error,
    },

    /// A positioned read/write on the value file moved fewer bytes than asked.
    #[error("short gpio value {op} ({actual} of {expected} bytes)")]
    ShortIo {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl GpioError {
    /// One-byte value file I/O is assumed infallible; when it fails the
    /// sysfs contract is broken and the port must not continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GpioError::ValueIo { .. } | GpioError::ShortIo { .. })
    }
}

/// Errors from the I2C controller.
#[derive(Debug, thiserror::Error)]
pub enum I2cError {
    /// The bus device could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `ioctl(I2C_SLAVE)` rejected the address.
    #[error("failed to bind slave address 0x{address:02x}: {source}")]
    SetAddress { address: u16, source: std::io::Error },

    /// A read larger than one I2C block was requested.
    #[error("read of {len} bytes exceeds the {max}-byte block limit")]
    ReadTooLong { len: usize, max: usize },

    /// The transfer syscall failed.
    #[error("i2c {op} (address 0x{address:02x}) failed: {source}")]
    Io {
        op: &'static str,
        address: u16,
        source: std::io::Error,
    },

    /// The device accepted fewer bytes than were written.
    #[error("short i2c write ({actual} of {expected} bytes)")]
    ShortWrite { expected: usize, actual: usize },

    /// The device returned fewer bytes than were requested.
    #[error("short i2c read ({actual} of {expected} bytes)")]
    ShortRead { expected: usize, actual: usize },
}

impl I2cError {
    /// Startup failures and protocol-limit violations end the port.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            I2cError::Open { .. } | I2cError::SetAddress { .. } | I2cError::ReadTooLong { .. }
        )
    }
}

pub type GpioResult<T> = std::result::Result<T, GpioError>;
pub type I2cResult<T> = std::result::Result<T, I2cError>;
