// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracking of live background processes for end-of-run teardown.

use parking_lot::Mutex;
use tokio::process::Child;
use tokio::task::JoinHandle;

/// A spawned background command: the child process, its pid, and the task
/// draining its stdout.
#[derive(Debug)]
pub struct BackgroundHandle {
    pub pid: u32,
    child: Child,
    reader: JoinHandle<()>,
}

impl BackgroundHandle {
    pub fn new(pid: u32, child: Child, reader: JoinHandle<()>) -> Self {
        Self { pid, child, reader }
    }

    /// Stop the reader task and force-kill the child. Errors are swallowed;
    /// the process may already be gone.
    fn stop(&mut self) {
        self.reader.abort();
        if let Err(e) = self.child.start_kill() {
            tracing::debug!(pid = self.pid, error = %e, "background process already gone");
        }
        // Reap so the pid is fully gone, not a zombie. Bounded: a process
        // stuck in uninterruptible sleep must not hang the teardown.
        for _ in 0..50 {
            match self.child.try_wait() {
                Ok(Some(_)) | Err(_) => return,
                Ok(None) => std::thread::sleep(std::time::Duration::from_millis(10)),
            }
        }
        tracing::warn!(pid = self.pid, "background process did not exit during cleanup");
    }
}

/// Every background process started during a run, drained exactly once by the
/// driver on exit. Adds and drains both happen on the main task; the mutex
/// only guards against misuse.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    entries: Mutex<Vec<(BackgroundHandle, String)>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handle: BackgroundHandle, description: impl Into<String>) {
        let description = description.into();
        tracing::debug!(pid = handle.pid, %description, "registered background process");
        self.entries.lock().push((handle, description));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Terminate every registered process. Idempotent; per-entry failures are
    /// swallowed so one stuck process never blocks the rest.
    pub fn cleanup(&self) {
        let mut entries = std::mem::take(&mut *self.entries.lock());
        if entries.is_empty() {
            return;
        }
        tracing::info!("cleaning up {} background processes", entries.len());
        for (handle, description) in entries.iter_mut() {
            tracing::debug!(pid = handle.pid, %description, "terminating");
            handle.stop();
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
