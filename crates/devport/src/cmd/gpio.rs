use devport_device::GpioConfig;
use devport_port::GpioPort;
use tracing::info;

use crate::cmd::{serve_stdio, GpioArgs};
use crate::exit::CliResult;

pub fn run(args: GpioArgs) -> CliResult<i32> {
    info!(sysfs_root = %args.sysfs_root.display(), "gpio port starting");
    let mut port = GpioPort::new(GpioConfig {
        sysfs_root: args.sysfs_root,
    });
    serve_stdio(&mut port)
}
