use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BusEntry {
    pub bus: u32,
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct BusesOutput<'a> {
    dir: &'a Path,
    prefix: &'a str,
    buses: &'a [BusEntry],
}

pub fn print_buses(dir: &Path, prefix: &str, buses: &[BusEntry], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = BusesOutput { dir, prefix, buses };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["BUS", "DEVICE"]);
            for entry in buses {
                table.add_row(vec![entry.bus.to_string(), entry.path.display().to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if buses.is_empty() {
                println!("no {prefix} buses under {}", dir.display());
            }
            for entry in buses {
                println!("bus={} device={}", entry.bus, entry.path.display());
            }
        }
    }
}
