/// Errors that can occur on the port's control channel descriptors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to duplicate a standard stream descriptor.
    #[error("failed to duplicate {stream}: {source}")]
    Duplicate {
        stream: &'static str,
        source: std::io::Error,
    },

    /// The readiness wait itself failed (anything other than EINTR).
    #[error("poll failed: {0}")]
    Poll(std::io::Error),

    /// An I/O error occurred on the channel stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
