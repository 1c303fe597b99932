use std::path::PathBuf;

use clap::Parser;

use crate::error::CoreError;

/// Partition a pipe-delimited sensor log by device and dispatch each
/// balanced chunk to an external analysis subprocess over a local socket.
#[derive(Parser, Debug)]
#[command(name = "sensor-chunk", version, about)]
pub struct Cli {
    /// Path to the input `.csv` file (pipe-delimited despite the extension).
    pub path: PathBuf,

    /// Header name of the device column.
    #[arg(default_value = "device")]
    pub device_column: String,

    /// Path to the analysis subprocess, invoked as `<subprocess> --uds-location <path>`.
    #[arg(long, default_value = "./src/script/analyze_data.py")]
    pub subprocess: PathBuf,

    /// Override the OS-reported processor count used for scanning,
    /// partitioning, and the worker pool.
    #[arg(long)]
    pub workers: Option<usize>,

    /// The analysis subprocess does not re-emit the header row in its
    /// response, so its line tally should not be decremented by one.
    #[arg(long)]
    pub no_header_echo: bool,
}

impl Cli {
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn subprocess_echoes_header(&self) -> bool {
        !self.no_header_echo
    }

    /// Reject any input path whose extension is not exactly `csv`.
    pub fn validate_extension(&self) -> Result<(), CoreError> {
        let is_csv = self
            .path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            Ok(())
        } else {
            Err(CoreError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("expected a .csv file, got {}", self.path.display()),
            )))
        }
    }
}
