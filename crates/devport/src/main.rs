mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "devport", version, about = "GPIO and I2C port processes")]
struct Cli {
    /// Output format for listing commands.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_i2c_positionals() {
        let cli = Cli::try_parse_from(["devport", "i2c", "/dev/i2c-1", "0x40"])
            .expect("i2c args should parse");

        match cli.command {
            Command::I2c(args) => {
                assert_eq!(args.device_path, Path::new("/dev/i2c-1"));
                assert_eq!(args.address, "0x40");
            }
            other => panic!("expected i2c, got {other:?}"),
        }
    }

    #[test]
    fn i2c_requires_an_address() {
        let err = Cli::try_parse_from(["devport", "i2c", "/dev/i2c-1"])
            .expect_err("missing address should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn gpio_sysfs_root_flag() {
        let cli = Cli::try_parse_from(["devport", "gpio", "--sysfs-root", "/tmp/fake-gpio"])
            .expect("gpio args should parse");
        match cli.command {
            Command::Gpio(args) => assert_eq!(args.sysfs_root, Path::new("/tmp/fake-gpio")),
            other => panic!("expected gpio, got {other:?}"),
        }
    }

    #[test]
    fn buses_defaults() {
        let cli = Cli::try_parse_from(["devport", "buses"]).expect("buses should parse");
        match cli.command {
            Command::Buses(args) => {
                assert_eq!(args.dir, Path::new("/dev"));
                assert_eq!(args.prefix, "i2c");
            }
            other => panic!("expected buses, got {other:?}"),
        }
    }

    #[test]
    fn global_log_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "devport",
            "gpio",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("global flags should parse");
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
