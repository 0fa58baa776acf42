// src/cli.rs
//
// Command-line host: lists plotters, edits saved settings, and plots files.
// Status changes are printed the way a window would show them in its status label.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use crate::io::serial::{list_ports, PlotterPort, SerialportTransport};
use crate::io::{EnumerationError, PathFileSource, TransferError};
use crate::logging;
use crate::settings::{self, PlotterSettings};
use crate::transfer::TransferController;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn app_name() -> String {
    format!("HPGL Sender v.{}", APP_VERSION)
}

#[derive(Parser, Debug)]
#[command(name = "hpgl-sender", version, about = "Send HPGL plot files to a serial pen plotter")]
struct Cli {
    /// Also write logs to a timestamped file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List serial ports a plotter may be attached to
    Ports {
        /// Print the port list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stream a plot file to the plotter
    Plot {
        /// HPGL file to send
        file: PathBuf,
        /// Serial port (defaults to the saved default port)
        #[arg(short, long)]
        port: Option<String>,
        /// Baud rate (defaults to the saved baud rate)
        #[arg(short, long)]
        baud: Option<u32>,
    },
    /// Show or update saved settings
    Config {
        #[arg(long)]
        baud: Option<u32>,
        #[arg(long, conflicts_with = "clear_port")]
        port: Option<String>,
        /// Forget the saved default port
        #[arg(long)]
        clear_port: bool,
    },
}

/// Parse arguments and run the requested command
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn execute(cli: Cli) -> Result<(), String> {
    let settings_path = match cli.settings {
        Some(path) => path,
        None => settings::get_settings_path()?,
    };
    let settings = settings::load_settings(&settings_path)?;

    let log_dir = cli
        .log_dir
        .or_else(|| settings.log_dir.as_ref().map(PathBuf::from));
    if let Some(dir) = &log_dir {
        logging::init_file_logging(dir)?;
    }

    tlog!("[cli] {}", app_name());

    let result = match cli.command {
        Command::Ports { json } => write_ports(list_ports(), json, &mut std::io::stdout().lock()),
        Command::Plot { file, port, baud } => plot(&settings, file, port, baud),
        Command::Config { baud, port, clear_port } => {
            update_config(&settings_path, settings, baud, port, clear_port)
        }
    };

    if let Err(e) = &result {
        tlog!("[cli] {}", e);
    }
    logging::stop_file_logging();
    result
}

/// Render an enumeration snapshot. A failed enumeration is returned as the error.
fn write_ports(
    ports: Result<Vec<PlotterPort>, EnumerationError>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let ports = ports.map_err(String::from)?;

    if json {
        let content = serde_json::to_string_pretty(&ports)
            .map_err(|e| format!("Failed to serialize ports: {}", e))?;
        return writeln!(out, "{}", content).map_err(|e| format!("Failed to write output: {}", e));
    }

    if ports.is_empty() {
        writeln!(out, "No serial ports found").map_err(|e| format!("Failed to write output: {}", e))?;
    }
    for port in ports {
        writeln!(out, "{}\t{}", port.name(), port.description())
            .map_err(|e| format!("Failed to write output: {}", e))?;
    }
    Ok(())
}

/// Guard rejections never started a job, so they are not reported as a failed plot
fn describe_plot_error(e: TransferError) -> String {
    if e.is_rejection() {
        format!("Plot not started: {}", e)
    } else {
        format!("Plot failed: {}", e)
    }
}

fn plot(
    settings: &PlotterSettings,
    file: PathBuf,
    port: Option<String>,
    baud: Option<u32>,
) -> Result<(), String> {
    let port = port
        .or_else(|| settings.default_port.clone())
        .ok_or_else(|| "No plotter port given and no default port saved".to_string())?;

    let transport =
        SerialportTransport::with_write_timeout(Duration::from_millis(settings.write_timeout_ms));
    let mut controller = TransferController::new(transport);
    controller.on_status_change(|status| println!("{}", status));

    controller
        .set_baud_rate(baud.unwrap_or(settings.baud_rate))
        .map_err(describe_plot_error)?;
    controller.select_port(PlotterPort::named(port));
    controller.select_file(Rc::new(PathFileSource::new(file)));

    controller.plot().map_err(describe_plot_error)
}

fn update_config(
    path: &std::path::Path,
    mut settings: PlotterSettings,
    baud: Option<u32>,
    port: Option<String>,
    clear_port: bool,
) -> Result<(), String> {
    let changed = baud.is_some() || port.is_some() || clear_port;

    if let Some(baud) = baud {
        if baud == 0 {
            return Err("Baud rate must be non-zero".to_string());
        }
        settings.baud_rate = baud;
    }
    if port.is_some() {
        settings.default_port = port;
    }
    if clear_port {
        settings.default_port = None;
    }

    if changed {
        settings::save_settings(path, &settings)?;
    }

    let content = serde_json::to_string_pretty(&settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    println!("{}", content);
    Ok(())
}
