// src/crawl/frontier.rs
// =============================================================================
// The work queue shared by the crawl workers, plus the join counter that
// tells them when the crawl is over.
//
// How termination works:
// - push() counts a task as outstanding, under the same lock that queues it
// - a worker takes a task with next() and gets back a TaskGuard
// - dropping the guard (normally, or while unwinding) counts the task out
// - when the count reaches zero and the queue is empty, every waiting worker
//   wakes up and next() returns None
//
// A task pushes its children before its own guard drops, so the counter can
// never touch zero while one of them is still unaccounted for.
// =============================================================================

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use url::Url;

// A URL waiting to be crawled, and how many links away from the seed it is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: usize,
}

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<State>,
    changed: Notify,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<CrawlTask>,
    outstanding: usize,
    closed: bool,
}

// A task handed out by next(). Counts the task as finished when dropped.
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
    task: CrawlTask,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task. Returns false (and drops the task) once the frontier
    /// has been closed.
    pub fn push(&self, task: CrawlTask) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            state.outstanding += 1;
            state.queue.push_back(task);
        }
        self.changed.notify_waiters();
        true
    }

    // Waits for the next task
    //
    // Returns None when there is nothing left to do: either every task has
    // finished, or the frontier was closed.
    pub async fn next(&self) -> Option<TaskGuard<'_>> {
        loop {
            // Registered before looking at the state, so a push or completion
            // that lands between the check and the await still wakes us.
            let changed = self.changed.notified();
            {
                let mut state = self.state.lock();
                if let Some(task) = state.queue.pop_front() {
                    return Some(TaskGuard {
                        frontier: self,
                        task,
                    });
                }
                if state.closed || state.outstanding == 0 {
                    return None;
                }
            }
            changed.await;
        }
    }

    // Stops the crawl: queued tasks are discarded and counted out, later
    // pushes are refused, and idle workers are woken so they can exit.
    // Tasks already handed out still finish through their guards.
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            state.closed = true;
            let discarded = state.queue.len();
            state.queue.clear();
            state.outstanding -= discarded;
        }
        self.changed.notify_waiters();
    }

    pub fn outstanding(&self) -> usize {
        self.state.lock().outstanding
    }

    fn complete(&self) {
        let finished = {
            let mut state = self.state.lock();
            state.outstanding -= 1;
            state.outstanding == 0
        };
        if finished {
            self.changed.notify_waiters();
        }
    }
}

impl TaskGuard<'_> {
    pub fn task(&self) -> &CrawlTask {
        &self.task
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.complete();
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why parking_lot::Mutex and not tokio::sync::Mutex?
//    - The lock is never held across an .await, only for a few field updates
//    - A blocking mutex is fine (and cheaper) for that
//    - parking_lot's lock() can't be poisoned, so there's no Result to unwrap
//
// 2. What does Notify::notified() do before the check?
//    - notify_waiters() only wakes futures that already exist
//    - Creating the future first means a wakeup sent while we are still
//      looking at the queue is not lost
//
// 3. Why is TaskGuard a separate type?
//    - Its Drop impl is the only place a task is counted as finished
//    - Rust runs Drop on every exit path, including early returns and panics
// -----------------------------------------------------------------------------
