use parking_lot::Mutex;
use std::collections::VecDeque;

use super::Task;

/// FIFO of tasks belonging to one lane.
///
/// `draining` is true while a worker owns the lane. The worker that owns it
/// pops tasks one at a time and releases ownership only when it finds the
/// queue empty, under the same lock, so no task is ever stranded and no two
/// workers run tasks of the same lane at once.
#[derive(Default)]
pub(super) struct LaneQueue {
    state: Mutex<LaneState>,
}

#[derive(Default)]
struct LaneState {
    queue: VecDeque<Task>,
    draining: bool,
}

impl LaneQueue {
    /// Enqueues `task`. Returns true if the caller must schedule a drain,
    /// i.e. no worker currently owns the lane.
    pub(super) fn push(&self, task: Task) -> bool {
        let mut state = self.state.lock();
        state.queue.push_back(task);
        if state.draining {
            false
        } else {
            state.draining = true;
            true
        }
    }

    /// Pops the next task, or releases ownership when the lane is empty.
    pub(super) fn next(&self) -> Option<Task> {
        let mut state = self.state.lock();
        let task = state.queue.pop_front();
        if task.is_none() {
            state.draining = false;
        }
        task
    }

    /// Drops every queued task and releases ownership.
    pub(super) fn abandon(&self) -> usize {
        let dropped = {
            let mut state = self.state.lock();
            state.draining = false;
            std::mem::take(&mut state.queue)
        };
        dropped.len()
    }

    /// Number of tasks waiting in the lane.
    pub(super) fn len(&self) -> usize {
        self.state.lock().queue.len()
    }
}
