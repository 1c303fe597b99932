pub mod chunk_queue;
pub mod cli;
pub mod device_index;
pub mod error;
pub mod ipc;
pub mod line_scan;
pub mod mapping;
pub mod orchestrator;
pub mod partition;
pub mod worker;

pub use cli::Cli;
pub use error::CoreError;
pub use orchestrator::{run, Report};
