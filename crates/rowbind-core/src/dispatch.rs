//! Designated dispatch queue for UI-thread delivery.
//!
//! Adapters and models are driven from a single UI thread, but change
//! notifications may originate from background work. Instead of relying on
//! coincidental thread affinity, every producer posts through a
//! [`DispatchHandle`] and the owning thread drains the [`DispatchQueue`].
//!
//! # How It Works
//!
//! 1. The UI thread creates a `DispatchQueue`. The queue remembers the thread
//!    that created it.
//! 2. Producers obtain cloned [`DispatchHandle`]s and [`post`](DispatchHandle::post)
//!    closures from any thread.
//! 3. The UI thread calls [`process_pending`](DispatchQueue::process_pending)
//!    (or [`process_batch`](DispatchQueue::process_batch)) during its idle
//!    time, executing tasks in FIFO order.
//!
//! # Example
//!
//! ```
//! use rowbind_core::DispatchQueue;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let queue = DispatchQueue::new();
//! let handle = queue.handle();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_clone = hits.clone();
//! std::thread::spawn(move || {
//!     handle.post(move || {
//!         hits_clone.fetch_add(1, Ordering::SeqCst);
//!     }).unwrap();
//! }).join().unwrap();
//!
//! assert_eq!(hits.load(Ordering::SeqCst), 0);
//! assert_eq!(queue.process_pending(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::ThreadId;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// Identifies one posted task in trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// The numeric id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

struct TaskData {
    id: TaskId,
    task: BoxedTask,
}

/// Records the thread an object belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Affinity to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The owning thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the owner.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panic with `msg` if called off the owning thread. Compiled out in
    /// release builds.
    #[inline]
    pub fn debug_assert_same_thread(&self, msg: &str) {
        debug_assert!(
            self.is_same_thread(),
            "{msg} (owner thread {:?}, current thread {:?})",
            self.thread_id,
            std::thread::current().id()
        );
    }
}

/// The receiving side of the designated dispatch queue.
///
/// Owned by the UI thread. Dropping the queue closes every outstanding
/// [`DispatchHandle`]; later posts fail with [`CoreError::DispatchClosed`].
pub struct DispatchQueue {
    sender: Sender<TaskData>,
    receiver: Receiver<TaskData>,
    affinity: ThreadAffinity,
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchQueue {
    /// Create a queue owned by the current thread.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            affinity: ThreadAffinity::current(),
        }
    }

    /// Get a handle producers can post through.
    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            sender: self.sender.clone(),
        }
    }

    /// The thread this queue delivers on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Whether any task is waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Number of waiting tasks.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Process up to `max` tasks.
    ///
    /// Returns the number of tasks processed.
    pub fn process_batch(&self, max: usize) -> usize {
        self.affinity
            .debug_assert_same_thread("dispatch queue drained off its owner thread");

        let mut processed = 0;
        while processed < max {
            match self.receiver.try_recv() {
                Ok(task_data) => {
                    tracing::trace!(
                        target: targets::DISPATCH,
                        task = task_data.id.as_u64(),
                        "running dispatched task"
                    );
                    (task_data.task)();
                    processed += 1;
                }
                Err(_) => break,
            }
        }
        processed
    }

    /// Process every task that was pending when the call started.
    ///
    /// Tasks posted by the tasks themselves run on the next call.
    ///
    /// Returns the number of tasks processed.
    pub fn process_pending(&self) -> usize {
        self.process_batch(self.receiver.len())
    }
}

/// A cloneable, thread-safe handle for posting to a [`DispatchQueue`].
#[derive(Clone)]
pub struct DispatchHandle {
    sender: Sender<TaskData>,
}

impl DispatchHandle {
    /// Post a task to run on the queue's owner thread.
    pub fn post<F>(&self, task: F) -> Result<TaskId>
    where
        F: FnOnce() + Send + 'static,
    {
        let id = next_task_id();
        self.sender
            .send(TaskData {
                id,
                task: Box::new(task),
            })
            .map_err(|_| CoreError::DispatchClosed)?;
        Ok(id)
    }
}

impl std::fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("pending", &self.sender.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(DispatchHandle: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_post_and_process() {
        let queue = DispatchQueue::new();
        let handle = queue.handle();
        let received = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let received_clone = received.clone();
            handle
                .post(move || received_clone.lock().push(i))
                .unwrap();
        }

        assert_eq!(queue.pending_count(), 3);
        assert!(received.lock().is_empty());

        assert_eq!(queue.process_pending(), 3);
        assert_eq!(*received.lock(), vec![0, 1, 2]);
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_process_batch_limit() {
        let queue = DispatchQueue::new();
        let handle = queue.handle();

        for _ in 0..5 {
            handle.post(|| {}).unwrap();
        }

        assert_eq!(queue.process_batch(2), 2);
        assert_eq!(queue.pending_count(), 3);
        assert_eq!(queue.process_pending(), 3);
    }

    #[test]
    fn test_post_from_other_thread_runs_on_owner() {
        let queue = DispatchQueue::new();
        let handle = queue.handle();
        let ran_on = Arc::new(Mutex::new(None));

        let ran_on_clone = ran_on.clone();
        std::thread::spawn(move || {
            handle
                .post(move || {
                    *ran_on_clone.lock() = Some(std::thread::current().id());
                })
                .unwrap();
        })
        .join()
        .unwrap();

        queue.process_pending();
        assert_eq!(*ran_on.lock(), Some(std::thread::current().id()));
    }

    #[test]
    fn test_post_after_queue_dropped() {
        let queue = DispatchQueue::new();
        let handle = queue.handle();
        drop(queue);

        assert_eq!(handle.post(|| {}).unwrap_err(), CoreError::DispatchClosed);
    }

    #[test]
    fn test_tasks_posted_during_drain_run_next_time() {
        let queue = DispatchQueue::new();
        let handle = queue.handle();
        let count = Arc::new(Mutex::new(0));

        let inner_handle = handle.clone();
        let count_clone = count.clone();
        handle
            .post(move || {
                *count_clone.lock() += 1;
                let count_inner = count_clone.clone();
                inner_handle
                    .post(move || *count_inner.lock() += 10)
                    .unwrap();
            })
            .unwrap();

        assert_eq!(queue.process_pending(), 1);
        assert_eq!(*count.lock(), 1);
        assert_eq!(queue.process_pending(), 1);
        assert_eq!(*count.lock(), 11);
    }

    #[test]
    fn test_thread_affinity() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());

        let other = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!other);
    }
}
