use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use portprobe::cli::Cli;
use portprobe::output::{scan_banner, OutputWriter};
use portprobe::{ScanError, Scanner};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<ScanError>()
                .map(ScanError::exit_code)
                .unwrap_or(1);
            eprintln!("{}", diagnostic(&e).red());
            ExitCode::from(code)
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // Reject bad ranges before touching the terminal or the network.
    let range = cli.port_range()?;
    let scanner = Scanner::new(cli.scan_config()).with_progress(!cli.no_progress);
    let output_writer = OutputWriter::new(cli.output_format, cli.output_file.clone());

    if !cli.no_clear && io::stdout().is_terminal() {
        clear_terminal()?;
    }
    eprintln!("{}", scan_banner(&cli.host));

    let report = scanner
        .scan_with_shutdown(&cli.host, &range, tokio::signal::ctrl_c())
        .await?;

    output_writer.write(&report)?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn clear_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x1B[2J\x1B[1;1H")?;
    stdout.flush()
}

fn diagnostic(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ScanError>() {
        Some(ScanError::Interrupted) => "You pressed Ctrl+C".to_string(),
        Some(ScanError::HostUnresolvable { .. }) => {
            "Hostname could not be resolved. Exiting".to_string()
        }
        Some(ScanError::Unreachable { .. }) => "Couldn't connect to server".to_string(),
        _ => format!("Error: {:#}", error),
    }
}
