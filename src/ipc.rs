//! Per-chunk subprocess dispatch over a local Unix domain socket.
//!
//! One socket, one subprocess, one chunk: bind a listener at a per-worker
//! path, spawn the analysis subprocess pointed at that path, accept its
//! single connection, and treat it as full-duplex — write the chunk, then
//! read the response to EOF. This is the single-accept variant permitted
//! in place of the source's bind-once-accept-twice shape.

use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CoreError;
use crate::partition::Chunk;

/// Minimum size of the read buffer reserved for a subprocess response.
const RESPONSE_BUF_RESERVE: usize = 1024 * 1024;

/// What came back from the subprocess for one chunk.
#[derive(Default)]
pub struct ChunkOutcome {
    pub bytes: Vec<u8>,
    pub lines: usize,
}

/// Dispatch one chunk to a freshly spawned subprocess instance.
///
/// Never returns an error: any failure along the way is logged and
/// folded into an empty outcome, per the per-chunk failure policy — a
/// failed chunk must never poison the worker that owns it.
pub fn dispatch_chunk(chunk: &Chunk, subprocess_path: &Path) -> ChunkOutcome {
    match try_dispatch(chunk, subprocess_path) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(worker_id = chunk.worker_id, %err, "chunk dropped");
            ChunkOutcome::default()
        }
    }
}

fn socket_path(worker_id: usize) -> PathBuf {
    PathBuf::from(format!("/tmp/uds_slice_{worker_id}.sock"))
}

fn try_dispatch(chunk: &Chunk, subprocess_path: &Path) -> Result<ChunkOutcome, CoreError> {
    let path = socket_path(chunk.worker_id);
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path).map_err(CoreError::SocketError)?;

    let mut child = match Command::new(subprocess_path)
        .arg("--uds-location")
        .arg(&path)
        .spawn()
    {
        Ok(child) => child,
        Err(err) => {
            // The listener already created the socket file; clean it up
            // before propagating, since nothing else will.
            let _ = std::fs::remove_file(&path);
            return Err(CoreError::SpawnError(err));
        }
    };

    let outcome = run_exchange(&listener, chunk);

    // The subprocess is always reaped before this function returns,
    // regardless of which step above failed.
    let _ = child.wait();
    let _ = std::fs::remove_file(&path);

    outcome
}

fn run_exchange(listener: &UnixListener, chunk: &Chunk) -> Result<ChunkOutcome, CoreError> {
    let (mut stream, _) = listener.accept().map_err(CoreError::SocketError)?;

    stream.write_all(chunk.header).map_err(CoreError::Io)?;
    stream.write_all(b"\n").map_err(CoreError::Io)?;
    stream.write_all(&chunk.bytes).map_err(CoreError::Io)?;
    stream.flush().map_err(CoreError::Io)?;
    // Shut down our write half so the subprocess's read-to-EOF completes;
    // the connection otherwise stays full-duplex (no half-close on its side
    // is required before it writes its response, per the subprocess contract).
    stream
        .shutdown(std::net::Shutdown::Write)
        .map_err(CoreError::Io)?;

    let mut response = Vec::with_capacity(RESPONSE_BUF_RESERVE);
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = stream.read(&mut buf).map_err(CoreError::Io)?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buf[..n]);
    }

    let lines = response.iter().filter(|&&b| b == b'\n').count();
    Ok(ChunkOutcome {
        bytes: response,
        lines,
    })
}
