//! stats-report - descriptive statistics for a CSV file

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod output;
mod report;
mod stats;
mod table;

use table::LoadError;

/// Load a CSV file and print descriptive statistics for every column
#[derive(Parser)]
#[command(name = "stats-report", version, about, long_about = None)]
struct Cli {
    /// Input file
    #[arg(default_value = "data.csv")]
    path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    output::info(&format!("Reading data from: {}", cli.path.display()));

    match run(&cli.path) {
        Ok(text) => {
            print!("{text}");
            info!("Report written for {}", cli.path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&e);
            ExitCode::from(1)
        }
    }
}

fn run(path: &Path) -> Result<String> {
    let table = table::load(path)?;
    debug!("Rendering report for {} columns", table.columns.len());
    Ok(report::render(&table)?)
}

fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<LoadError>() {
        Some(e @ LoadError::NotFound { .. }) => {
            output::error(&format!("Error: {e}"));
            match std::env::current_dir() {
                Ok(dir) => output::detail(&format!("Current directory: {}", dir.display())),
                Err(e) => output::detail(&format!("Current directory: unavailable ({e})")),
            }
            output::detail(&format!("Files in directory: {}", list_dir(Path::new("."))));
        }
        _ => output::error(&format!("Error processing file: {err}")),
    }
}

fn list_dir(dir: &Path) -> String {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            format!("[{}]", names.join(", "))
        }
        Err(e) => format!("unavailable ({e})"),
    }
}
