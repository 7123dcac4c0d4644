//! Device controllers owned by a single port process.
//!
//! - [`gpio::GpioPin`]: one sysfs GPIO pin and its edge interrupts
//! - [`i2c::I2cDevice`]: one i2c-dev descriptor bound to a slave address
//! - [`naming`]: logical identifiers to device paths
//!
//! Errors come in two tiers. Most variants are operational: the port replies
//! with an error and carries on. Variants for which `is_fatal()` returns
//! true mean an invariant of the device or the protocol broke, and the port
//! must exit.

pub mod error;
pub mod gpio;
pub mod i2c;
pub mod naming;

pub use error::{GpioError, I2cError};
pub use gpio::{Direction, Edge, EdgeMode, GpioConfig, GpioPin, PinState};
pub use i2c::{I2cDevice, I2C_BLOCK_MAX};
pub use naming::{enumerate_buses, parse_address, GpioPaths};
