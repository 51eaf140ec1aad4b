//! The UI thread: one OS thread draining a job queue.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam_channel::{Receiver, Sender};

use crate::error::DispatchError;

/// Work queued for the UI thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run work on the UI thread.
pub trait UiExecutor: Send + Sync {
    /// True when called from the UI thread itself.
    fn is_ui_thread(&self) -> bool;

    /// Queue a job without waiting for it.
    fn call_serially(&self, job: Job) -> Result<(), DispatchError>;
}

/// A dedicated UI thread.
pub struct UiThread {
    /// Dropped on shutdown, which ends the drain loop.
    jobs: Mutex<Option<Sender<Job>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
    thread_id: ThreadId,
}

impl UiThread {
    /// Spawn the thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded::<Job>();
        let handle = thread::Builder::new()
            .name("lwuit-ui".into())
            .spawn(move || drain(rx))?;
        let thread_id = handle.thread().id();
        tracing::debug!(?thread_id, "UI thread started");

        Ok(Self {
            jobs: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
            thread_id,
        })
    }

    /// Run `f` on the UI thread and wait for its result.
    ///
    /// Runs inline when already on the UI thread.
    pub fn call_serially_and_wait<R, F>(&self, f: F) -> Result<R, DispatchError>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_ui_thread() {
            return Ok(f());
        }
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.call_serially(Box::new(move || {
            let _ = tx.send(f());
        }))?;
        rx.recv().map_err(|_| DispatchError::Disconnected)
    }

    /// True while the queue is open and the thread has not exited.
    pub fn is_running(&self) -> bool {
        let open = self.jobs.lock().map(|jobs| jobs.is_some()).unwrap_or(false);
        let alive = self
            .handle
            .lock()
            .map(|handle| handle.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false);
        open && alive
    }

    /// Stop accepting jobs, let queued ones finish, and join the thread.
    ///
    /// Called from the UI thread itself this only closes the queue.
    pub fn shutdown(&self) {
        let sender = match self.jobs.lock() {
            Ok(mut jobs) => jobs.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if sender.is_none() {
            return;
        }
        drop(sender);

        if self.is_ui_thread() {
            return;
        }
        let handle = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!("UI thread panicked");
            }
        }
        tracing::debug!("UI thread stopped");
    }
}

impl UiExecutor for UiThread {
    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    fn call_serially(&self, job: Job) -> Result<(), DispatchError> {
        let jobs = self.jobs.lock().map_err(|_| DispatchError::Disconnected)?;
        let sender = jobs.as_ref().ok_or(DispatchError::Disconnected)?;
        sender.send(job).map_err(|_| DispatchError::Disconnected)
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for UiThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiThread")
            .field("thread_id", &self.thread_id)
            .field("running", &self.is_running())
            .finish()
    }
}

/// The UI loop. A panicking job is logged and dropped; the loop keeps going.
fn drain(jobs: Receiver<Job>) {
    for job in jobs {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(message = panic_message(&*payload), "UI job panicked");
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}

/// Treats whichever thread calls it as the UI thread.
///
/// For single-threaded hosts and tests: every dispatch runs inline.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl UiExecutor for InlineExecutor {
    fn is_ui_thread(&self) -> bool {
        true
    }

    fn call_serially(&self, job: Job) -> Result<(), DispatchError> {
        job();
        Ok(())
    }
}
