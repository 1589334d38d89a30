use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use colored::*;

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;

pub struct OutputWriter {
    format: OutputFormat,
    file: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, file: Option<PathBuf>) -> Self {
        Self { format, file }
    }

    pub fn write(&self, report: &ScanReport) -> Result<()> {
        let output = self.render(report)?;

        match &self.file {
            Some(path) => {
                let file = File::create(path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(output.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", output);
                io::stdout().flush()?;
            }
        }

        Ok(())
    }

    pub fn render(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(format_human(report)),
            OutputFormat::Json => format_json(report),
            OutputFormat::Csv => Ok(format_csv(report)),
        }
    }
}

/// Banner printed before the scan starts.
pub fn scan_banner(host: &str) -> String {
    format!("Scanning ports on {} ...\n", host.bold())
}

fn format_human(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n",
        format!("{:<8} {:<8} {:<8} {}", "Port", "Type", "Status", "Service").bold()
    ));

    for result in report.open_ports() {
        output.push_str(&format!(
            "{:<8} {:<8} {} {}\n",
            result.port,
            result.protocol.to_string(),
            format!("{:<8}", result.status.to_string()).green(),
            result.service.as_deref().unwrap_or("Unknown")
        ));
    }

    output.push_str(&format!("{} scanned closed ports\n", report.closed_count()));
    if report.error_count() > 0 {
        output.push_str(&format!(
            "{}\n",
            format!("{} ports failed with unexpected socket errors", report.error_count()).yellow()
        ));
    }
    output.push_str(&format!("\nScanning Completed in {:.2?}\n", report.elapsed()));

    output
}

fn format_json(report: &ScanReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

fn format_csv(report: &ScanReport) -> String {
    let mut csv = String::from("host,port,type,status,service\n");

    for result in report.results() {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            report.host(),
            result.port,
            result.protocol,
            result.status,
            result.service.as_deref().unwrap_or("")
        ));
    }

    csv
}
