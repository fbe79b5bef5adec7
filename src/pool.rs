//! Fixed-size worker pool with a bounded task queue and per-task futures.

use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Task = Box<dyn FnOnce() + Send + 'static>;

enum State<T> {
    Pending,
    Ready(T),
    /// The task was dropped or panicked before producing a value.
    Abandoned,
}

struct Slot<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Slot<T> {
    fn complete(&self, state: State<T>) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*guard, State::Pending) {
            *guard = state;
            self.ready.notify_all();
        }
    }
}

/// Write side of a [`TaskFuture`]. Dropping it unfulfilled abandons the future.
pub struct Promise<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Promise<T> {
    pub fn fulfil(self, value: T) {
        self.slot.complete(State::Ready(value));
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        self.slot.complete(State::Abandoned);
    }
}

/// Handle to the eventual result of a task. Clones observe the same result.
pub struct TaskFuture<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Clone for TaskFuture<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone> TaskFuture<T> {
    /// Block until the task finishes. `None` if it never produced a value.
    pub fn wait(&self) -> Option<T> {
        let mut guard = self.slot.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match &*guard {
                State::Pending => {
                    guard = self
                        .slot
                        .ready
                        .wait(guard)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                State::Ready(value) => return Some(value.clone()),
                State::Abandoned => return None,
            }
        }
    }
}

/// A connected promise/future pair.
pub fn promise<T>() -> (Promise<T>, TaskFuture<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(State::Pending),
        ready: Condvar::new(),
    });
    (
        Promise {
            slot: Arc::clone(&slot),
        },
        TaskFuture { slot },
    )
}

/// Signals the pool once per worker, including when a worker unwinds.
struct ExitSignal(Sender<()>);

impl Drop for ExitSignal {
    fn drop(&mut self) {
        let _ = self.0.send(());
    }
}

pub struct WorkerPool {
    tasks: Option<Sender<Task>>,
    exits: Receiver<()>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Start `threads` workers sharing a task queue of `capacity` entries.
    pub fn new(threads: usize, capacity: usize) -> Result<Self> {
        let (task_tx, task_rx) = bounded::<Task>(capacity);
        let (exit_tx, exit_rx) = bounded(threads);
        let mut handles = Vec::with_capacity(threads);
        for i in 0..threads {
            let tasks = task_rx.clone();
            let signal = ExitSignal(exit_tx.clone());
            let handle = thread::Builder::new()
                .name(format!("trim-worker-{i}"))
                .spawn(move || {
                    let _signal = signal;
                    while let Ok(task) = tasks.recv() {
                        task();
                    }
                })
                .map_err(|e| Error::io("spawn", format!("trim-worker-{i}"), e))?;
            handles.push(handle);
        }
        log::debug!("started {threads} workers, task queue capacity {capacity}");
        Ok(Self {
            tasks: Some(task_tx),
            exits: exit_rx,
            handles,
        })
    }

    pub fn threads(&self) -> usize {
        self.handles.len()
    }

    /// Queue `job` and return a future for its result.
    ///
    /// Blocks while the task queue is full.
    pub fn submit<T, F>(&self, job: F) -> Result<TaskFuture<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (promise, future) = promise();
        let task: Task = Box::new(move || promise.fulfil(job()));
        self.tasks
            .as_ref()
            .ok_or(Error::Disconnected("worker pool"))?
            .send(task)
            .map_err(|_| Error::Disconnected("worker pool"))?;
        Ok(future)
    }

    /// Stop accepting work, let queued tasks finish, and join the workers.
    pub fn shutdown(mut self, timeout: Duration) -> Result<()> {
        drop(self.tasks.take());
        let deadline = Instant::now() + timeout;
        for _ in 0..self.handles.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.exits.recv_timeout(remaining) {
                Ok(()) => {}
                Err(RecvTimeoutError::Timeout) => return Err(Error::ShutdownTimeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        let mut panicked = false;
        for handle in self.handles.drain(..) {
            panicked |= handle.join().is_err();
        }
        if panicked {
            return Err(Error::StagePanicked("worker"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn futures_resolve_with_task_results() {
        let pool = WorkerPool::new(3, 6).unwrap();
        assert_eq!(pool.threads(), 3);
        let futures: Vec<_> = (0..20u64)
            .map(|i| pool.submit(move || i * i).unwrap())
            .collect();
        let results: Vec<u64> = futures.iter().map(|f| f.wait().unwrap()).collect();
        assert_eq!(results, (0..20u64).map(|i| i * i).collect::<Vec<_>>());
        pool.shutdown(Duration::from_secs(10)).unwrap();
    }

    #[test]
    fn cloned_futures_see_the_same_value() {
        let pool = WorkerPool::new(1, 2).unwrap();
        let future = pool.submit(|| String::from("done")).unwrap();
        let other = future.clone();
        assert_eq!(future.wait().as_deref(), Some("done"));
        assert_eq!(other.wait().as_deref(), Some("done"));
        pool.shutdown(Duration::from_secs(10)).unwrap();
    }

    #[test]
    fn shutdown_drains_queued_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(2, 4).unwrap();
        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.shutdown(Duration::from_secs(10)).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn dropped_promise_abandons_future() {
        let (promise, future) = promise::<u32>();
        drop(promise);
        assert_eq!(future.wait(), None);
    }

    #[test]
    fn panicking_task_abandons_its_future() {
        let pool = WorkerPool::new(1, 1).unwrap();
        let future = pool.submit(|| -> u32 { panic!("boom") }).unwrap();
        assert_eq!(future.wait(), None);
        assert!(matches!(
            pool.shutdown(Duration::from_secs(10)),
            Err(Error::StagePanicked("worker"))
        ));
    }
}
