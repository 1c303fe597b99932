use thiserror::Error;

/// Fatal and per-chunk error taxonomy for the ingestion/dispatch pipeline.
///
/// Variants marked "fatal" abort startup before any worker exists; the rest
/// are caught inside a single worker's chunk loop and never escape it.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fatal: the input file has zero length.
    #[error("input file is empty")]
    EmptyFile,

    /// Fatal: the OS mapping call failed.
    #[error("failed to map file: {0}")]
    MapError(String),

    /// Fatal: the configured device column was not found in the header.
    #[error("column {expected:?} not found in header")]
    ColumnNotFound { expected: String },

    /// Fatal: an allocation failed while building the device index.
    #[error("out of memory while building device index")]
    OutOfMemory,

    /// Per-chunk: the analysis subprocess could not be spawned.
    #[error("failed to spawn subprocess: {0}")]
    SpawnError(std::io::Error),

    /// Per-chunk: bind/listen/accept on the worker's local socket failed.
    #[error("socket error: {0}")]
    SocketError(std::io::Error),
}
