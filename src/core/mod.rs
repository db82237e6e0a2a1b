//! The work-distribution engine behind a walk.
//!
//! Work items are directories; expanding one means listing it and routing
//! every discovered subdirectory back into a pool of per-worker queues.
//! The pool winds down exactly when no queue holds work and no worker is
//! mid-expansion.

mod read_children;
mod run_context;
mod shard;
mod shard_pool;
mod worker;

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use read_children::read_child_dirs;
use run_context::RunContext;
use worker::Worker;

use crate::timer::{Precision, ScopeTimer};
use crate::{Error, Parallelism, Report, Result};

/// A directory awaiting expansion. Created once, consumed exactly once by
/// exactly one worker.
#[derive(Debug)]
pub(crate) struct WorkUnit {
    path: PathBuf,
    depth: usize,
}

impl WorkUnit {
    pub(crate) fn new(path: PathBuf, depth: usize) -> Self {
        WorkUnit { path, depth }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Clone)]
pub(crate) struct WalkOptions {
    pub(crate) parallelism: Parallelism,
    pub(crate) max_depth: usize,
    pub(crate) skip_hidden: bool,
    pub(crate) stop: Arc<AtomicBool>,
}

/// Tallies produced by one traversal, before timing is attached.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Counts {
    pub(crate) discovered: u64,
    pub(crate) skipped: u64,
}

/// Validate the root, run the selected engine, and report what it found.
pub(crate) fn walk(root: &Path, options: WalkOptions) -> Result<Report> {
    let metadata = fs::metadata(root).map_err(|source| Error::InvalidRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let _timer = ScopeTimer::with_precision("walk", Precision::Millis);
    let started = Instant::now();
    let stop = Arc::clone(&options.stop);

    let counts = if options.max_depth == 0 {
        Counts {
            discovered: 0,
            skipped: 0,
        }
    } else {
        match options.parallelism {
            Parallelism::Serial => serial_walk(root, &options),
            Parallelism::SharedPair => pooled_walk(root, options, 2, 1)?,
            Parallelism::Sharded(workers) => {
                let workers = workers.max(1);
                pooled_walk(root, options, workers, workers)?
            }
        }
    };

    Ok(Report {
        directories: counts.discovered,
        skipped: counts.skipped,
        elapsed: started.elapsed(),
        completed: !stop.load(AtomicOrdering::SeqCst),
    })
}

/// Breadth-first on the calling thread, sharing the expansion semantics of
/// the pooled engine but none of its machinery.
fn serial_walk(root: &Path, options: &WalkOptions) -> Counts {
    let mut counts = Counts {
        discovered: 0,
        skipped: 0,
    };
    let mut queue = VecDeque::new();
    queue.push_back(WorkUnit::new(root.to_path_buf(), 0));

    while let Some(unit) = queue.pop_front() {
        if options.stop.load(AtomicOrdering::SeqCst) {
            break;
        }
        match read_child_dirs(unit.path(), options.skip_hidden) {
            Ok(children) => {
                let child_depth = unit.depth() + 1;
                for path in children {
                    counts.discovered += 1;
                    if child_depth < options.max_depth {
                        queue.push_back(WorkUnit::new(path, child_depth));
                    }
                }
            }
            Err(error) => {
                warn!(path = %unit.path().display(), %error, "skipping unreadable directory");
                counts.skipped += 1;
            }
        }
    }
    counts
}

/// Seed the pool with the root, run `worker_count` workers over
/// `shard_count` shards, and join them all.
fn pooled_walk(
    root: &Path,
    options: WalkOptions,
    worker_count: usize,
    shard_count: usize,
) -> Result<Counts> {
    let ctx = Arc::new(RunContext::new(shard_count, options));
    ctx.pool().push(WorkUnit::new(root.to_path_buf(), 0));

    let mut workers = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        match Worker::spawn(id, id % shard_count, Arc::clone(&ctx)) {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                // Let the already-running workers wind down before bailing.
                ctx.stop();
                for worker in workers {
                    let _ = worker.join();
                }
                return Err(err);
            }
        }
    }

    let mut first_panic = None;
    for worker in workers {
        if let Err(err) = worker.join() {
            first_panic.get_or_insert(err);
        }
    }
    if let Some(err) = first_panic {
        return Err(err);
    }

    debug_assert!(ctx.pool().is_drained() || ctx.is_stopped());
    debug_assert_eq!(0, ctx.in_flight());
    Ok(ctx.counts())
}
