//! Fixed-size worker pool with independently ordered lanes.
//!
//! All workers drain one shared `crossbeam-channel` queue. A job on that
//! queue is either an unordered task or a request to drain one [`Lane`].
//!
//! # Lane guarantees
//!
//! - At most one task of a lane executes at any instant.
//! - Tasks of a lane execute in submission order.
//! - Tasks of different lanes (and unordered tasks) run concurrently.
//!
//! # Lifecycle
//!
//! ```text
//!   new() ──► Stopped ──start()──► Running ──stop()──► Stopped
//!                 ▲                   │ start() is a no-op
//!                 └── stop() no-op ───┘
//! ```
//!
//! [`Scheduler::stop`] cancels pending delayed tasks, stops accepting new
//! work, lets every queued and in-flight task finish, then joins all
//! threads. Submissions while stopped are rejected with a log line.
//!
//! # Example
//!
//! ```
//! use scorbit_sync::logging::Logger;
//! use scorbit_sync::scheduler::{Lane, Scheduler};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let scheduler = Scheduler::new(2, Logger::silent());
//! scheduler.start();
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! for _ in 0..10 {
//!     let counter = counter.clone();
//!     scheduler.post_to(Lane::GameData, move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! scheduler.stop();
//! assert_eq!(counter.load(Ordering::SeqCst), 10);
//! ```

mod lane;
mod timer;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use web_time::Duration;

use crate::logging::Logger;
use crate::{sdk_debug, sdk_error, sdk_warn};

use lane::LaneQueue;
use timer::TimerQueue;

/// Default number of worker threads.
pub const DEFAULT_WORKER_THREADS: usize = 4;

/// A unit of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An ordering domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Authentication, installed reports, pairing, leaderboard, unpair,
    /// picture downloads.
    Default,
    /// Game-data and history uploads.
    GameData,
    /// Periodic heartbeats.
    Heartbeat,
}

impl Lane {
    /// Every lane.
    pub const ALL: [Self; 3] = [Self::Default, Self::GameData, Self::Heartbeat];

    const fn index(self) -> usize {
        match self {
            Self::Default => 0,
            Self::GameData => 1,
            Self::Heartbeat => 2,
        }
    }

    /// Returns a string representation suitable for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::GameData => "game-data",
            Self::Heartbeat => "heartbeat",
        }
    }
}

enum Job {
    Unordered(Task),
    Drain(Lane),
}

struct Shared {
    sender: RwLock<Option<Sender<Job>>>,
    lanes: [LaneQueue; 3],
    timers: TimerQueue,
    logger: Logger,
}

impl Shared {
    fn lane(&self, lane: Lane) -> &LaneQueue {
        &self.lanes[lane.index()]
    }

    fn post(&self, task: Task) -> bool {
        let sender = self.sender.read();
        let Some(sender) = sender.as_ref() else {
            sdk_warn!(self.logger, "Scheduler is stopped, rejecting task");
            return false;
        };
        if sender.send(Job::Unordered(task)).is_err() {
            sdk_error!(self.logger, "No worker thread is alive, dropping task");
            return false;
        }
        true
    }

    fn post_to(&self, lane: Lane, task: Task) -> bool {
        let sender = self.sender.read();
        let Some(sender) = sender.as_ref() else {
            sdk_warn!(
                self.logger,
                "Scheduler is stopped, rejecting task for lane {}",
                lane.as_str()
            );
            return false;
        };
        if self.lane(lane).push(task) && sender.send(Job::Drain(lane)).is_err() {
            let dropped = self.lane(lane).abandon();
            sdk_error!(
                self.logger,
                "No worker thread is alive, dropping {} task(s) of lane {}",
                dropped,
                lane.as_str()
            );
            return false;
        }
        true
    }

    fn run(&self, task: Task) {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            sdk_error!(self.logger, "Scheduled task panicked");
        }
    }

    fn worker_loop(&self, jobs: &Receiver<Job>) {
        for job in jobs.iter() {
            match job {
                Job::Unordered(task) => self.run(task),
                Job::Drain(lane) => {
                    while let Some(task) = self.lane(lane).next() {
                        self.run(task);
                    }
                },
            }
        }
    }
}

#[derive(Default)]
struct Threads {
    workers: Vec<JoinHandle<()>>,
    timer: Option<JoinHandle<()>>,
}

/// Worker pool with lanes and one-shot delayed tasks.
///
/// All methods take `&self`; tasks may hold a handle to the scheduler and
/// submit follow-up work from inside a worker.
pub struct Scheduler {
    shared: Arc<Shared>,
    threads: Mutex<Threads>,
    num_threads: usize,
}

impl Scheduler {
    /// Creates a stopped scheduler. `num_threads` of zero is raised to one.
    #[must_use]
    pub fn new(num_threads: usize, logger: Logger) -> Self {
        Self {
            shared: Arc::new(Shared {
                sender: RwLock::new(None),
                lanes: Default::default(),
                timers: TimerQueue::default(),
                logger,
            }),
            threads: Mutex::new(Threads::default()),
            num_threads: num_threads.max(1),
        }
    }

    /// Number of worker threads started by [`start`](Self::start).
    #[must_use]
    pub const fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Returns true between [`start`](Self::start) and [`stop`](Self::stop).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.sender.read().is_some()
    }

    /// Spawns the worker and timer threads. No-op if already running.
    pub fn start(&self) {
        let mut threads = self.threads.lock();
        let mut sender = self.shared.sender.write();
        if sender.is_some() {
            return;
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        for index in 0..self.num_threads {
            let shared = self.shared.clone();
            let jobs = rx.clone();
            match thread::Builder::new()
                .name(format!("scorbit-worker-{index}"))
                .spawn(move || shared.worker_loop(&jobs))
            {
                Ok(handle) => threads.workers.push(handle),
                Err(err) => {
                    sdk_error!(self.shared.logger, "Failed to spawn worker {}: {}", index, err);
                },
            }
        }
        drop(rx);
        *sender = Some(tx);
        drop(sender);

        self.shared.timers.reset();
        let shared = self.shared.clone();
        match thread::Builder::new()
            .name("scorbit-timer".to_owned())
            .spawn(move || {
                shared.timers.run(|lane, task| {
                    let _ = shared.post_to(lane, task);
                });
            }) {
            Ok(handle) => threads.timer = Some(handle),
            Err(err) => {
                sdk_error!(self.shared.logger, "Failed to spawn timer thread: {}", err);
            },
        }

        sdk_debug!(
            self.shared.logger,
            "Scheduler started with {} worker thread(s)",
            threads.workers.len()
        );
    }

    /// Cancels delayed tasks, drains queued work and joins every thread.
    /// No-op if already stopped.
    ///
    /// When called from one of the scheduler's own workers, that worker is
    /// detached instead of joined.
    pub fn stop(&self) {
        let mut threads = self.threads.lock();

        let cancelled = self.shared.timers.shutdown();
        if let Some(timer) = threads.timer.take() {
            join(&self.shared.logger, timer);
        }

        let Some(sender) = self.shared.sender.write().take() else {
            return;
        };
        drop(sender);

        let current = thread::current().id();
        for worker in threads.workers.drain(..) {
            if worker.thread().id() != current {
                join(&self.shared.logger, worker);
            }
        }

        sdk_debug!(
            self.shared.logger,
            "Scheduler stopped, {} delayed task(s) cancelled",
            cancelled
        );
    }

    /// Submits a task with no ordering constraint.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        self.shared.post(Box::new(task))
    }

    /// Submits a task into `lane`.
    pub fn post_to(&self, lane: Lane, task: impl FnOnce() + Send + 'static) -> bool {
        self.shared.post_to(lane, Box::new(task))
    }

    /// Submits a task into `lane` once `delay` has elapsed.
    ///
    /// Pending delayed tasks are cancelled by [`stop`](Self::stop).
    pub fn run_after(
        &self,
        delay: Duration,
        lane: Lane,
        task: impl FnOnce() + Send + 'static,
    ) -> bool {
        if !self.is_running() {
            sdk_warn!(
                self.shared.logger,
                "Scheduler is stopped, rejecting delayed task for lane {}",
                lane.as_str()
            );
            return false;
        }
        if !self.shared.timers.schedule(delay, lane, Box::new(task)) {
            sdk_debug!(
                self.shared.logger,
                "Scheduler is stopping, dropping delayed task for lane {}",
                lane.as_str()
            );
            return false;
        }
        true
    }

    /// Number of delayed tasks not yet due.
    #[must_use]
    pub fn pending_delayed(&self) -> usize {
        self.shared.timers.pending()
    }

    /// Number of tasks waiting in `lane`, not counting one being executed.
    #[must_use]
    pub fn queued(&self, lane: Lane) -> usize {
        self.shared.lane(lane).len()
    }
}

fn join(logger: &Logger, handle: JoinHandle<()>) {
    if handle.join().is_err() {
        sdk_error!(logger, "Scheduler thread panicked");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("num_threads", &self.num_threads)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
