use std::collections::VecDeque;
use std::sync::Mutex;

use super::WorkUnit;

/// A single mutex-guarded FIFO of directories awaiting expansion.
///
/// Each shard is independently lockable; contention is bounded by how many
/// workers route work at the same shard, not by the pool as a whole.
pub(crate) struct Shard {
    items: Mutex<VecDeque<WorkUnit>>,
}

impl Shard {
    pub(crate) fn new() -> Self {
        Shard {
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, unit: WorkUnit) {
        self.items.lock().unwrap().push_back(unit);
    }

    pub(crate) fn pop(&self) -> Option<WorkUnit> {
        self.items.lock().unwrap().pop_front()
    }

    /// Point-in-time count, stale the moment the lock is released.
    pub(crate) fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn unit(name: &str) -> WorkUnit {
        WorkUnit::new(PathBuf::from(name), 0)
    }

    #[test]
    fn fifo_within_one_shard() {
        let shard = Shard::new();
        shard.push(unit("a"));
        shard.push(unit("b"));
        shard.push(unit("c"));
        assert_eq!(3, shard.len());

        assert_eq!(Path::new("a"), shard.pop().unwrap().path());
        assert_eq!(Path::new("b"), shard.pop().unwrap().path());
        assert_eq!(Path::new("c"), shard.pop().unwrap().path());
        assert!(shard.pop().is_none());
        assert_eq!(0, shard.len());
    }
}
