use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use super::shard::Shard;
use super::WorkUnit;

/// A fixed set of shards plus the bookkeeping that routes new work toward
/// short queues and decides when the whole pool is out of work.
///
/// Two counters with distinct jobs:
///
/// * `queued`: units committed to some shard and not yet popped. Purely
///   informational (`len`), never drives termination.
/// * `pending`: units queued *or* popped-but-not-fully-expanded. Raised
///   before a pushed unit becomes visible, lowered only via [`complete`]
///   once a popped unit's children have all been pushed. Termination must
///   read one counter; two independent atomics cannot be loaded as a
///   consistent snapshot.
///
/// [`complete`]: ShardPool::complete
pub(crate) struct ShardPool {
    shards: Vec<Shard>,
    /// Permutation over shard indices, viewed as an implicit binary tree.
    /// Reordered only under this lock; the shards it refers to may grow or
    /// shrink between selection and the insert that follows, so selection
    /// is best-effort by construction.
    order: Mutex<Vec<usize>>,
    queued: AtomicUsize,
    pending: AtomicUsize,
}

impl ShardPool {
    pub(crate) fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "pool needs at least one shard");
        ShardPool {
            shards: (0..shard_count).map(|_| Shard::new()).collect(),
            order: Mutex::new((0..shard_count).collect()),
            queued: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
        }
    }

    /// Append `unit` to the shard currently believed shortest.
    pub(crate) fn push(&self, unit: WorkUnit) {
        self.pending.fetch_add(1, AtomicOrdering::SeqCst);
        self.queued.fetch_add(1, AtomicOrdering::SeqCst);
        self.select_shard().push(unit);
    }

    /// Remove the front unit of the caller's own shard.
    ///
    /// Returns `None` when that shard is empty even if other shards still
    /// hold work; imbalance is corrected on the push side only.
    pub(crate) fn pop(&self, shard_index: usize) -> Option<WorkUnit> {
        let unit = self.shards[shard_index].pop()?;
        self.queued.fetch_sub(1, AtomicOrdering::SeqCst);
        Some(unit)
    }

    /// Lower the pending count for one popped unit. Callers must have
    /// already pushed every child the unit's expansion discovered.
    pub(crate) fn complete(&self) {
        self.pending.fetch_sub(1, AtomicOrdering::SeqCst);
    }

    /// Total committed units across all shards.
    pub(crate) fn len(&self) -> usize {
        self.queued.load(AtomicOrdering::SeqCst)
    }

    /// True once nothing is queued anywhere and nothing is mid-expansion.
    ///
    /// Monotone: only an in-flight expansion can add work, and every
    /// expansion is itself accounted in `pending`. Once true, stays true.
    pub(crate) fn is_drained(&self) -> bool {
        self.pending.load(AtomicOrdering::SeqCst) == 0
    }

    /// One bottom-up pass over the permutation: any slot whose parent
    /// refers to a longer shard trades places with it, then the shard at
    /// the root slot is chosen. Not a full heap restore; the root slot
    /// merely tends toward a short shard.
    fn select_shard(&self) -> &Shard {
        let mut order = self.order.lock().unwrap();
        for child in (1..order.len()).rev() {
            let parent = (child - 1) / 2;
            if self.shard_len(order[parent]) > self.shard_len(order[child]) {
                order.swap(parent, child);
            }
        }
        &self.shards[order[0]]
    }

    fn shard_len(&self, index: usize) -> usize {
        self.shards[index].len()
    }
}
