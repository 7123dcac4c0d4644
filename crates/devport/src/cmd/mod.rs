use clap::{Args, Subcommand};
use std::path::PathBuf;

use devport_device::naming::{DEFAULT_DEV_DIR, DEFAULT_GPIO_SYSFS_ROOT, I2C_PREFIX};
use devport_frame::{FrameReader, FrameWriter};
use devport_port::{serve, Port};
use devport_transport::PortStream;

use crate::exit::{port_error, transport_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

pub mod buses;
pub mod gpio;
pub mod i2c;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve one sysfs GPIO pin over stdin/stdout.
    Gpio(GpioArgs),
    /// Serve one I2C slave over stdin/stdout.
    I2c(I2cArgs),
    /// List I2C bus numbers.
    Buses(BusesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Gpio(args) => gpio::run(args),
        Command::I2c(args) => i2c::run(args),
        Command::Buses(args) => buses::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct GpioArgs {
    /// Root of the GPIO sysfs class.
    #[arg(
        long,
        value_name = "DIR",
        env = "DEVPORT_GPIO_SYSFS_ROOT",
        default_value = DEFAULT_GPIO_SYSFS_ROOT
    )]
    pub sysfs_root: PathBuf,
}

#[derive(Args, Debug)]
pub struct I2cArgs {
    /// i2c-dev node, e.g. /dev/i2c-1.
    pub device_path: PathBuf,
    /// 7-bit slave address: decimal, 0x-prefixed hex or 0-prefixed octal.
    pub address: String,
}

#[derive(Args, Debug)]
pub struct BusesArgs {
    /// Directory to scan.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DEV_DIR)]
    pub dir: PathBuf,
    /// Device node prefix.
    #[arg(long, default_value = I2C_PREFIX)]
    pub prefix: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Run `port` on this process's stdin and stdout until the parent closes
/// stdin.
pub fn serve_stdio<P: Port>(port: &mut P) -> CliResult<i32> {
    let input = PortStream::stdin().map_err(|err| transport_error("stdin", err))?;
    let output = PortStream::stdout().map_err(|err| transport_error("stdout", err))?;

    let mut reader = FrameReader::new(input);
    let mut writer = FrameWriter::new(output);
    serve(port, &mut reader, &mut writer).map_err(|err| port_error(port.name(), err))?;
    Ok(SUCCESS)
}
