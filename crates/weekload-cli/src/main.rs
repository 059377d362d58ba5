//! weekload CLI - Weekly Workload Reports
//!
//! Reads a tracker export (.xlsx) and writes the weekly workload report of
//! every department and worker to a styled workbook.

mod args;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weekload_core::Layout;
use weekload_ingest::{build_roster, read_records};
use weekload_render::ExcelRenderer;
use weekload_report::ReportModel;

use args::FreezeCell;

#[derive(Parser)]
#[command(name = "weekload")]
#[command(author, version, about = "Weekly workload report generator", long_about = None)]
struct Cli {
    /// Input filename (must be xlsx)
    #[arg(value_name = "INPUT_FILENAME", value_parser = args::input_filename)]
    input_filename: PathBuf,

    /// Output filename (must be xlsx)
    #[arg(short, long, default_value = "output.xlsx", value_parser = args::output_filename)]
    output_filename: PathBuf,

    /// Year for data generation
    #[arg(short, long, default_value_t = args::current_year(), value_parser = args::year)]
    year: i32,

    /// Cell cords for freezing rows above and columns to the left (ex: "3,3" or "12, 34")
    #[arg(long, default_value = "4,4", value_parser = args::freeze_cell)]
    freeze_cell: FreezeCell,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Also write the generated layout as JSON
    #[arg(long, value_name = "PATH")]
    layout_json: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // flushes the log file on drop
    let _log_guard = match init_tracing(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => {
            println!(
                "Data successfully generated to \"{}\"!",
                cli.output_filename.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("An exception has occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!(
        input = %cli.input_filename.display(),
        output = %cli.output_filename.display(),
        year = cli.year,
        freeze_cell = %cli.freeze_cell,
        "generating workload report"
    );

    let records = read_records(&cli.input_filename)
        .with_context(|| format!("Failed to read {}", cli.input_filename.display()))?;
    let roster = build_roster(&records, cli.year).context("Failed to build roster")?;
    let layout = ReportModel::new(&roster.departments)
        .generate_data(cli.year)
        .context("Failed to generate report layout")?;

    if let Some(path) = &cli.layout_json {
        write_layout_json(&layout, path)?;
    }

    ExcelRenderer::new()
        .freeze_cell(cli.freeze_cell.row, cli.freeze_cell.col)
        .write_to_file(&layout, &cli.output_filename)
        .with_context(|| format!("Failed to write {}", cli.output_filename.display()))?;

    Ok(())
}

fn write_layout_json(layout: &Layout, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(layout).context("Failed to serialize layout")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "layout written");
    Ok(())
}

/// Console logging on stderr, plus a plain-text log file when requested.
///
/// `RUST_LOG` takes precedence over the level derived from `-v`. The log file
/// is truncated and written by a background worker; the returned guard must
/// live until exit.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let env_filter = |default: LevelFilter| {
        EnvFilter::builder()
            .with_default_directive(default.into())
            .from_env_lossy()
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(level));

    let mut guard = None;
    let mut file_writer = None;
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Cannot create log file {}", path.display()))?;
        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        guard = Some(worker_guard);
        file_writer = Some(writer);
    }

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(env_filter(level.max(LevelFilter::INFO)))
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}
