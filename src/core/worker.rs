use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::utils::Backoff;
use tracing::{debug, warn};

use super::read_children::read_child_dirs;
use super::run_context::RunContext;
use super::WorkUnit;
use crate::{Error, Result};

/// One traversal thread, bound to a single shard index for its lifetime.
pub(crate) struct Worker {
    id: usize,
    handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn spawn(id: usize, shard_index: usize, ctx: Arc<RunContext>) -> Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("shardwalk-worker-{id}"))
            .spawn(move || worker_loop(&ctx, id, shard_index))
            .map_err(|source| Error::Spawn { id, source })?;
        Ok(Worker { id, handle })
    }

    pub(crate) fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| Error::WorkerPanic { id: self.id })
    }
}

/// Idle-Poll -> Processing -> Idle-Poll -> Terminated.
///
/// The loop never blocks: an empty shard is re-polled with a spin-then-yield
/// backoff until either the pool drains or the stop flag is raised. Every
/// worker evaluates the same drain predicate independently; the predicate
/// is monotone once true, so no exit is ever premature.
fn worker_loop(ctx: &RunContext, worker_id: usize, shard_index: usize) {
    debug!(worker = worker_id, shard = shard_index, "worker starting");
    // A worker dying mid-expansion would leave the pending count raised
    // forever and the rest of the pool spinning on it.
    let _guard = StopOnPanic(ctx);

    let backoff = Backoff::new();
    loop {
        if ctx.is_stopped() {
            break;
        }
        match ctx.pool().pop(shard_index) {
            Some(unit) => {
                ctx.begin_expansion();
                expand(ctx, unit);
                ctx.finish_expansion();
                backoff.reset();
            }
            None => {
                if ctx.pool().is_drained() {
                    break;
                }
                backoff.snooze();
            }
        }
    }
    debug!(worker = worker_id, "worker finished");
}

/// List `unit`'s children and route each discovered subdirectory back into
/// the pool. A listing failure skips the whole directory: it is logged,
/// tallied, and the traversal moves on.
fn expand(ctx: &RunContext, unit: WorkUnit) {
    let children = match read_child_dirs(unit.path(), ctx.options().skip_hidden) {
        Ok(children) => children,
        Err(error) => {
            warn!(path = %unit.path().display(), %error, "skipping unreadable directory");
            ctx.record_skipped();
            return;
        }
    };

    let child_depth = unit.depth() + 1;
    for path in children {
        ctx.record_discovered();
        if child_depth < ctx.options().max_depth {
            ctx.pool().push(WorkUnit::new(path, child_depth));
        }
    }
}

struct StopOnPanic<'a>(&'a RunContext);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.stop();
        }
    }
}
