//! Worker pool: `N` threads drain the shared chunk queue and dispatch each
//! chunk to the IPC layer, accumulating results per originating worker id.

use std::path::Path;
use std::sync::Mutex;

use crate::chunk_queue::ChunkQueue;
use crate::ipc;

/// Concatenated bytes and LF tally for all chunks routed to one worker id.
#[derive(Default)]
pub struct WorkerResult {
    pub bytes: Vec<u8>,
    pub tally: usize,
}

/// Run `worker_count` threads against `queue` until it closes and drains.
///
/// Results are indexed by the chunk's own worker-id tag (assigned by the
/// partitioner), not by which physical thread happened to dequeue it —
/// the queue is a generic MPMC drain, but result accounting must match
/// the partitioner's bucket assignment.
pub fn run_workers(queue: &ChunkQueue, worker_count: usize, subprocess_path: &Path) -> Vec<WorkerResult> {
    let worker_count = worker_count.max(1);
    let results: Vec<Mutex<WorkerResult>> = (0..worker_count).map(|_| Mutex::new(WorkerResult::default())).collect();

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            scope.spawn(|| worker_loop(queue, subprocess_path, &results));
        }
    });

    results
        .into_iter()
        .map(|m| m.into_inner().expect("worker result mutex poisoned"))
        .collect()
}

fn worker_loop(queue: &ChunkQueue, subprocess_path: &Path, results: &[Mutex<WorkerResult>]) {
    while let Some(chunk) = queue.dequeue() {
        let worker_id = chunk.worker_id;
        tracing::debug!(worker_id, lines = chunk.line_count, "dispatching chunk");

        let outcome = ipc::dispatch_chunk(&chunk, subprocess_path);

        let mut slot = results[worker_id].lock().expect("worker result mutex poisoned");
        slot.bytes.extend_from_slice(&outcome.bytes);
        slot.tally += outcome.lines;
    }
}
