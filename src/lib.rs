#![warn(clippy::all)]

//! Parallel directory traversal over per-worker sharded work queues.
//!
//! A fixed pool of worker threads pulls directories from a pool of
//! mutex-guarded FIFO queues, one queue per worker. Each worker only ever
//! dequeues from its own queue; discovered subdirectories are routed back
//! into the pool toward whichever queue currently looks shortest, so load
//! is balanced on the enqueue side. The pool terminates exactly when no
//! queue holds work and no worker is mid-expansion. Symlinked directories
//! are never followed or counted.
//!
//! # Example
//!
//! Count the directories under "foo" with one worker per CPU:
//!
//! ```no_run
//! use shardwalk::Walk;
//!
//! # fn try_main() -> shardwalk::Result<()> {
//! let report = Walk::new("foo").run()?;
//! println!("{} directories in {:?}", report.directories, report.elapsed);
//! # Ok(())
//! # }
//! ```
//!
//! Traversal order across queues is unspecified; only the final count and
//! the set of visited directories are deterministic for a given tree.

mod core;
mod error;
mod timer;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::core::WalkOptions;

pub use crate::error::{Error, Result};
pub use crate::timer::{Precision, ScopeTimer};

/// How directory expansion is scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parallelism {
    /// Breadth-first on the calling thread.
    Serial,
    /// Two workers draining a single shared queue.
    SharedPair,
    /// One queue per worker, with new work routed toward short queues.
    Sharded(usize),
}

/// Builder for a directory traversal rooted at one path.
pub struct Walk {
    root: PathBuf,
    options: WalkOptions,
}

impl Walk {
    /// Create a traversal of the directory at `root`. The root itself is
    /// validated when [`run`](Walk::run) is called and is not counted.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Walk {
            root: root.as_ref().to_path_buf(),
            options: WalkOptions {
                parallelism: Parallelism::Sharded(num_cpus::get()),
                max_depth: usize::MAX,
                skip_hidden: false,
                stop: Arc::new(AtomicBool::new(false)),
            },
        }
    }

    /// Root path of the walk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scheduling mode. Defaults to one sharded worker per CPU.
    pub fn parallelism(mut self, parallelism: Parallelism) -> Self {
        self.options.parallelism = parallelism;
        self
    }

    /// Bound the traversal depth. `0` corresponds to the root itself, so
    /// nothing is counted; directories at the bound are counted but not
    /// expanded. Defaults to unbounded.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    /// Ignore dot-directories. Disabled by default.
    pub fn skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.options.skip_hidden = skip_hidden;
        self
    }

    /// The flag every worker checks between polls and expansions. Store
    /// `true` to wind the traversal down early; the eventual
    /// [`Report::completed`] will be `false`.
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.options.stop)
    }

    /// Run the traversal and report what it found.
    pub fn run(self) -> Result<Report> {
        core::walk(&self.root, self.options)
    }
}

/// What a finished traversal found.
#[derive(Clone, Debug)]
pub struct Report {
    /// Directories discovered below the root. The root itself is not
    /// counted, and neither is any symlinked directory.
    pub directories: u64,
    /// Directories that could not be listed and were skipped; when this is
    /// non-zero, `directories` is a lower bound.
    pub skipped: u64,
    /// Wall-clock duration of the traversal.
    pub elapsed: Duration,
    /// False when the stop signal ended the traversal early.
    pub completed: bool,
}
