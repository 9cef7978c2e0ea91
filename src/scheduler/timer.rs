use parking_lot::{Condvar, Mutex, MutexGuard};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use web_time::{Duration, Instant};

use super::{Lane, Task};

struct Entry {
    deadline: Instant,
    seq: u64,
    lane: Lane,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Default)]
struct TimerState {
    pending: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    shutdown: bool,
}

/// One-shot delayed tasks, ordered by deadline then submission order.
#[derive(Default)]
pub(super) struct TimerQueue {
    state: Mutex<TimerState>,
    wakeup: Condvar,
}

impl TimerQueue {
    /// Clears the shutdown flag so a restarted timer thread keeps running.
    pub(super) fn reset(&self) {
        self.state.lock().shutdown = false;
    }

    /// Queues `task`. Returns false, dropping `task` with the lock released,
    /// once [`shutdown`](Self::shutdown) has been called.
    pub(super) fn schedule(&self, delay: Duration, lane: Lane, task: Task) -> bool {
        let mut state = self.state.lock();
        if state.shutdown {
            drop(state);
            drop(task);
            return false;
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(Reverse(Entry {
            deadline: Instant::now() + delay,
            seq,
            lane,
            task,
        }));
        drop(state);
        self.wakeup.notify_one();
        true
    }

    /// Cancels every pending task and asks the timer thread to exit.
    /// Returns the number of cancelled tasks.
    pub(super) fn shutdown(&self) -> usize {
        let cancelled = {
            let mut state = self.state.lock();
            state.shutdown = true;
            std::mem::take(&mut state.pending)
        };
        self.wakeup.notify_all();
        cancelled.len()
    }

    pub(super) fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Timer thread body. Hands each due task to `fire` with the lock released.
    pub(super) fn run(&self, mut fire: impl FnMut(Lane, Task)) {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return;
            }
            let now = Instant::now();
            let next_deadline = state.pending.peek().map(|Reverse(entry)| entry.deadline);
            match next_deadline {
                Some(deadline) if deadline <= now => {
                    if let Some(Reverse(entry)) = state.pending.pop() {
                        MutexGuard::unlocked(&mut state, || fire(entry.lane, entry.task));
                    }
                },
                Some(deadline) => {
                    self.wakeup
                        .wait_for(&mut state, deadline.saturating_duration_since(now));
                },
                None => self.wakeup.wait(&mut state),
            }
        }
    }
}
