use devport_device::{GpioError, I2cError};

/// Conditions that end a port process.
///
/// Operational device failures never become a `PortError`; they are
/// answered with `{error, Reason}` and the port keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Control channel descriptor or readiness wait failure.
    #[error("transport error: {0}")]
    Transport(#[from] devport_transport::TransportError),

    /// Frame-level error (truncated frame, failed reply write).
    #[error("frame error: {0}")]
    Frame(#[from] devport_frame::FrameError),

    /// A payload that is not a valid term, or a reply that can't be encoded.
    #[error("term error: {0}")]
    Term(#[from] devport_term::TermError),

    /// A well-formed term that is not a request this port understands.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A GPIO invariant broke (short value-file I/O).
    #[error("gpio fault: {0}")]
    Gpio(GpioError),

    /// An I2C invariant broke (read beyond the block limit).
    #[error("i2c fault: {0}")]
    I2c(I2cError),
}

impl PortError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        PortError::Protocol(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PortError>;
