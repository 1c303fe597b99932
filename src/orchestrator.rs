//! Composes mapping → line scan → device index → partition → queue →
//! worker pool into a single run, and aggregates the per-worker tallies.

use crate::chunk_queue::ChunkQueue;
use crate::cli::Cli;
use crate::device_index::{build_device_index, locate_column};
use crate::error::CoreError;
use crate::line_scan::{header_range, scan_lines};
use crate::mapping::Mapping;
use crate::partition::partition_devices;
use crate::worker::run_workers;

/// Per-worker and aggregate results of one run.
pub struct Report {
    pub worker_count: usize,
    pub malformed_lines: usize,
    pub per_worker_tally: Vec<usize>,
    pub total_tally: usize,
}

pub fn run(cli: &Cli) -> Result<Report, CoreError> {
    cli.validate_extension()?;

    let mapping = Mapping::open(&cli.path)?;
    let bytes = mapping.bytes();
    let worker_count = cli.worker_count();

    tracing::info!(path = %cli.path.display(), worker_count, "mapped input file");

    let header = header_range(bytes);
    let header_bytes = &bytes[header.start..header.end];

    let column = locate_column(header_bytes, &cli.device_column).ok_or_else(|| CoreError::ColumnNotFound {
        expected: cli.device_column.clone(),
    })?;

    let lines = scan_lines(bytes, worker_count);
    tracing::debug!(data_lines = lines.len(), "line scan complete");

    let index = build_device_index(bytes, &lines, column, worker_count);
    tracing::debug!(
        devices = index.device_count(),
        malformed = index.malformed_lines(),
        "device index built"
    );

    let chunks = partition_devices(bytes, &index, worker_count, header_bytes);

    let queue = ChunkQueue::new();
    for chunk in chunks {
        queue.enqueue(chunk);
    }
    queue.close();

    let results = run_workers(&queue, worker_count, &cli.subprocess);

    let echoes_header = cli.subprocess_echoes_header();
    let mut per_worker_tally = Vec::with_capacity(results.len());
    let mut total_tally = 0usize;
    for result in &results {
        let adjusted = if echoes_header && !result.bytes.is_empty() {
            result.tally.saturating_sub(1)
        } else {
            result.tally
        };
        per_worker_tally.push(adjusted);
        total_tally += adjusted;
    }

    Ok(Report {
        worker_count,
        malformed_lines: index.malformed_lines(),
        per_worker_tally,
        total_tally,
    })
}
