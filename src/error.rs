use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Alias for `Result<T, shardwalk::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// An error produced while setting up or running a traversal.
///
/// Directories that fail to list *during* a traversal are not errors; they
/// are skipped and tallied in [`Report::skipped`](crate::Report::skipped).
/// Everything here is fatal and raised before, or instead of, a result.
#[derive(Debug, Error)]
pub enum Error {
    /// The root path could not be read at all.
    #[error("invalid root {}: {source}", .path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The root path exists but is not a directory.
    #[error("root {} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker {id}: {source}")]
    Spawn {
        id: usize,
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked; the traversal result is unusable.
    #[error("worker {id} panicked")]
    WorkerPanic { id: usize },
}
