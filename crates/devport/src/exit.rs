use std::fmt;
use std::io;

use devport_device::{GpioError, I2cError};
use devport_frame::FrameError;
use devport_port::PortError;
use devport_transport::TransportError;

// Process exit codes. USAGE and DEVICE_UNAVAILABLE are EX_USAGE and
// EX_UNAVAILABLE from sysexits.h; DATA_INVALID covers protocol violations.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const DEVICE_UNAVAILABLE: i32 = 69;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => DEVICE_UNAVAILABLE,
        io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } | FrameError::Truncated { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::Eof => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn gpio_error(context: &str, err: GpioError) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}

pub fn i2c_error(context: &str, err: I2cError) -> CliError {
    match err {
        I2cError::Open { ref source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        I2cError::Open { .. } | I2cError::SetAddress { .. } => {
            CliError::new(DEVICE_UNAVAILABLE, format!("{context}: {err}"))
        }
        I2cError::ReadTooLong { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn port_error(context: &str, err: PortError) -> CliError {
    match err {
        PortError::Transport(err) => transport_error(context, err),
        PortError::Frame(err) => frame_error(context, err),
        PortError::Term(_) | PortError::Protocol(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        PortError::Gpio(err) => gpio_error(context, err),
        PortError::I2c(err) => i2c_error(context, err),
    }
}
