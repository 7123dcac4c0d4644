//! Request dispatch and event loop for device port processes.
//!
//! A port process owns exactly one device. Requests arrive as framed terms
//! on the control channel, are decoded into a closed set of operations,
//! and answered on the reply channel:
//!
//! ```text
//! {init, Pin, Direction}           -> ok | {error, gpio_init_fail}
//! {cast, release}                  -> (no reply)
//! {call, Ref, Op}                  -> {port_reply, Ref, Result}
//! ```
//!
//! GPIO ports also emit `{gpio_interrupt, rising | falling}` on their own
//! when an armed pin changes.

pub mod error;
pub mod gpio;
pub mod i2c;
pub mod reply;
pub mod request;
pub mod runner;

pub use error::{PortError, Result};
pub use gpio::GpioPort;
pub use i2c::I2cPort;
pub use request::{GpioCall, GpioRequest, I2cCall, I2cRequest};
pub use runner::{serve, Port};
