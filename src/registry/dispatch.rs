use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::foundation::core::{MediaId, SlotId, TopScopeId};

/// Deferred work. At most one instance of each task is pending: posting a task again cancels the
/// pending one and reschedules it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Task {
    Refresh(TopScopeId),
    Bind(SlotId),
    Release(MediaId),
    Destroy(MediaId),
    Play(MediaId),
    Cleanup,
}

/// Virtual-time task queue.
///
/// Determinism rule: tasks run by due time, then by posting order.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    now_ms: u64,
    seq: u64,
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    live: BTreeMap<u64, Task>,
    by_task: BTreeMap<Task, u64>,
}

impl TaskQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn post(&mut self, task: Task, delay_ms: u64) {
        self.cancel(task);
        self.seq = self.seq.saturating_add(1);
        let due = self.now_ms.saturating_add(delay_ms);
        self.heap.push(Reverse((due, self.seq)));
        self.live.insert(self.seq, task);
        self.by_task.insert(task, self.seq);
    }

    pub(crate) fn cancel(&mut self, task: Task) -> bool {
        match self.by_task.remove(&task) {
            Some(seq) => self.live.remove(&seq).is_some(),
            None => false,
        }
    }

    /// Cancel every pending task matching `pred`.
    #[cfg(test)]
    pub(crate) fn cancel_where(&mut self, pred: impl Fn(&Task) -> bool) {
        let doomed: Vec<Task> = self.by_task.keys().copied().filter(|t| pred(t)).collect();
        for task in doomed {
            self.cancel(task);
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, task: Task) -> bool {
        self.by_task.contains_key(&task)
    }

    /// Pop the next task due at or before `until_ms`, moving the clock to its due time.
    pub(crate) fn pop_due(&mut self, until_ms: u64) -> Option<Task> {
        while let Some(&Reverse((due, seq))) = self.heap.peek() {
            if due > until_ms {
                return None;
            }
            self.heap.pop();
            let Some(task) = self.live.remove(&seq) else {
                // Cancelled.
                continue;
            };
            self.by_task.remove(&task);
            self.now_ms = self.now_ms.max(due);
            return Some(task);
        }
        None
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/dispatch.rs"]
mod tests;
