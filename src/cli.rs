use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScanError;
use crate::ports::PortRange;
use crate::scanner::ScanConfig;

/// More probes in flight than there are ports buys nothing.
pub const MAX_CONCURRENCY: u64 = 65535;

#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version)]
#[command(about = "TCP port scanner", long_about = None)]
#[command(after_help = "Example: portprobe www.hackthissite.org 1 1000")]
pub struct Cli {
    #[arg(value_name = "HOST", help = "Host name or IP address to scan")]
    pub host: String,

    #[arg(value_name = "STARTPORT", requires = "endport", help = "Start scanning from this port")]
    pub startport: Option<u32>,

    #[arg(value_name = "ENDPORT", help = "Scan until this port (inclusive)")]
    pub endport: Option<u32>,

    #[arg(long, value_name = "MS", default_value_t = 500, help = "Per-port connect timeout in milliseconds")]
    pub timeout: u64,

    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=MAX_CONCURRENCY),
        help = "Maximum probes in flight at once (1-65535)"
    )]
    pub concurrency: usize,

    #[arg(short = 'o', long, value_enum, default_value = "human", help = "Output format")]
    pub output_format: OutputFormat,

    #[arg(short = 'f', long, help = "Output file path")]
    pub output_file: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, help = "Do not clear the terminal before scanning")]
    pub no_clear: bool,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Cli {
    /// Bounded when both ports are given, the well-known set otherwise.
    pub fn port_range(&self) -> Result<PortRange, ScanError> {
        match (self.startport, self.endport) {
            (Some(start), Some(end)) => PortRange::bounded(start, end),
            _ => Ok(PortRange::Explicit),
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            timeout: Duration::from_millis(self.timeout),
            concurrency: self.concurrency,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    #[value(name = "human", help = "Human-readable table of open ports")]
    Human,
    #[value(name = "json", help = "JSON output")]
    Json,
    #[value(name = "csv", help = "CSV output")]
    Csv,
}
