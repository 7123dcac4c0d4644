use devport_device::{parse_address, I2cDevice};
use devport_port::I2cPort;

use crate::cmd::{serve_stdio, I2cArgs};
use crate::exit::{i2c_error, CliError, CliResult, USAGE};

pub fn run(args: I2cArgs) -> CliResult<i32> {
    let address = parse_address(&args.address).ok_or_else(|| {
        CliError::new(USAGE, format!("invalid i2c address: {}", args.address))
    })?;

    let device = I2cDevice::open(&args.device_path, address).map_err(|err| {
        i2c_error(
            &format!("cannot bind {}", args.device_path.display()),
            err,
        )
    })?;
    let mut port = I2cPort::new(device);
    serve_stdio(&mut port)
}
