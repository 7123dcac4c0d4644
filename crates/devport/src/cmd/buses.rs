use devport_device::enumerate_buses;

use crate::cmd::BusesArgs;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_buses, BusEntry, OutputFormat};

pub fn run(args: BusesArgs, format: OutputFormat) -> CliResult<i32> {
    let buses = enumerate_buses(&args.dir, &args.prefix)
        .map_err(|err| io_error(&format!("cannot scan {}", args.dir.display()), err))?;

    let entries: Vec<BusEntry> = buses
        .into_iter()
        .map(|bus| BusEntry {
            bus,
            path: args.dir.join(format!("{}-{bus}", args.prefix)),
        })
        .collect();

    print_buses(&args.dir, &args.prefix, &entries, format);
    Ok(SUCCESS)
}
