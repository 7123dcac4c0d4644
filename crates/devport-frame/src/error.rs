/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel closed cleanly on a frame boundary.
    #[error("control channel closed")]
    Eof,

    /// The channel closed inside a length prefix or payload.
    #[error("truncated frame ({buffered} of {needed} bytes received)")]
    Truncated { needed: usize, buffered: usize },
}

impl FrameError {
    /// Returns true for the orderly end of the control channel.
    pub fn is_eof(&self) -> bool {
        matches!(self, FrameError::Eof)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
