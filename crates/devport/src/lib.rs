//! GPIO and I2C port processes.
//!
//! A port process owns one device and is driven by its parent over stdin
//! and stdout: every message is a 2-byte big-endian length followed by an
//! external term format payload.
//!
//! # Crate Structure
//!
//! - [`transport`]: stdio endpoints and the readiness wait
//! - [`frame`]: length-prefixed framing
//! - [`term`]: the external term format subset spoken on the wire
//! - [`device`]: sysfs GPIO pins and i2c-dev slaves
//! - [`port`]: request decoding, replies and the serve loop

/// Re-export transport types.
pub mod transport {
    pub use devport_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use devport_frame::*;
}

/// Re-export term types.
pub mod term {
    pub use devport_term::*;
}

/// Re-export device types.
pub mod device {
    pub use devport_device::*;
}

/// Re-export port types.
pub mod port {
    pub use devport_port::*;
}
