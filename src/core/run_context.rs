use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use super::shard_pool::ShardPool;
use super::{Counts, WalkOptions};

/// State shared by every worker of one traversal.
pub(crate) struct RunContext {
    pool: ShardPool,
    options: WalkOptions,
    in_flight: AtomicUsize,
    discovered: AtomicU64,
    skipped: AtomicU64,
}

impl RunContext {
    pub(crate) fn new(shard_count: usize, options: WalkOptions) -> Self {
        RunContext {
            pool: ShardPool::new(shard_count),
            options,
            in_flight: AtomicUsize::new(0),
            discovered: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub(crate) fn pool(&self) -> &ShardPool {
        &self.pool
    }

    pub(crate) fn options(&self) -> &WalkOptions {
        &self.options
    }

    pub(crate) fn stop(&self) {
        self.options.stop.store(true, AtomicOrdering::SeqCst);
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.options.stop.load(AtomicOrdering::SeqCst)
    }

    /// Raise the in-flight count for a popped unit before expanding it.
    pub(crate) fn begin_expansion(&self) {
        self.in_flight.fetch_add(1, AtomicOrdering::SeqCst);
    }

    /// Retire a popped unit once all of its children are enqueued: the
    /// pool's pending count first, then the in-flight count.
    pub(crate) fn finish_expansion(&self) {
        self.pool.complete();
        self.in_flight.fetch_sub(1, AtomicOrdering::SeqCst);
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(AtomicOrdering::SeqCst)
    }

    pub(crate) fn record_discovered(&self) {
        self.discovered.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub(crate) fn counts(&self) -> Counts {
        Counts {
            discovered: self.discovered.load(AtomicOrdering::Relaxed),
            skipped: self.skipped.load(AtomicOrdering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use super::super::WorkUnit;
    use super::*;
    use crate::Parallelism;

    fn context() -> RunContext {
        RunContext::new(
            1,
            WalkOptions {
                parallelism: Parallelism::Sharded(1),
                max_depth: usize::MAX,
                skip_hidden: false,
                stop: Arc::new(AtomicBool::new(false)),
            },
        )
    }

    #[test]
    fn expansion_protocol_tracks_in_flight() {
        let ctx = context();
        ctx.pool().push(WorkUnit::new(PathBuf::from("root"), 0));

        let _unit = ctx.pool().pop(0).unwrap();
        ctx.begin_expansion();
        assert_eq!(1, ctx.in_flight());
        assert!(!ctx.pool().is_drained(), "unit is mid-expansion");

        ctx.finish_expansion();
        assert_eq!(0, ctx.in_flight());
        assert!(ctx.pool().is_drained());
    }

    #[test]
    fn stop_flag_round_trips() {
        let ctx = context();
        assert!(!ctx.is_stopped());
        ctx.stop();
        assert!(ctx.is_stopped());
    }

    #[test]
    fn counts_snapshot_the_tallies() {
        let ctx = context();
        ctx.record_discovered();
        ctx.record_discovered();
        ctx.record_skipped();

        let counts = ctx.counts();
        assert_eq!(2, counts.discovered);
        assert_eq!(1, counts.skipped);
    }
}
