//! The current-process slot
//!
//! Holds the one script process that may be running at a time. A run
//! reserves it before spawning, attaches the pid once the child exists and
//! releases it on terminal resolution. Signal cleanup reads it.

use crate::error::{ExecutionError, ExecutionResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// The process currently occupying the slot
#[derive(Debug, Clone)]
pub struct RunningProcess {
    pub run_id: u64,
    pub pid: Option<u32>,
    cancel: CancellationToken,
}

impl RunningProcess {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Single-occupancy slot for the running script
#[derive(Debug, Default)]
pub struct ProcessSlot {
    current: Mutex<Option<RunningProcess>>,
    next_run_id: AtomicU64,
}

impl ProcessSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the slot for a run about to spawn. Fails if the slot is taken.
    pub fn occupy(&self, cancel: CancellationToken) -> ExecutionResult<u64> {
        let mut current = self.current.lock();
        if let Some(running) = current.as_ref() {
            return Err(ExecutionError::AlreadyRunning(running.pid));
        }

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        *current = Some(RunningProcess {
            run_id,
            pid: None,
            cancel,
        });
        Ok(run_id)
    }

    /// Record the pid of the process spawned for `run_id`
    pub fn attach_pid(&self, run_id: u64, pid: Option<u32>) {
        if let Some(running) = self.current.lock().as_mut() {
            if running.run_id == run_id {
                running.pid = pid;
            }
        }
    }

    /// Clear the slot for `run_id`. Only the first call for a run does
    /// anything; later calls, or calls for a stale run, return `false`.
    pub fn release(&self, run_id: u64) -> bool {
        let mut current = self.current.lock();
        match current.as_ref() {
            Some(running) if running.run_id == run_id => {
                *current = None;
                true
            }
            _ => false,
        }
    }

    /// Request cancellation of the running process, if any.
    ///
    /// Returns `true` when a process was present. The owner of the child
    /// handle kills it once it observes the cancelled token.
    pub fn cleanup(&self) -> bool {
        let current = self.current.lock();
        match current.as_ref() {
            Some(running) => {
                tracing::debug!(pid = ?running.pid, run_id = running.run_id, "cancelling running script");
                running.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Send SIGKILL to the running process, if it has a pid.
    ///
    /// Used right before the program exits, when nobody is left to wait for
    /// the child.
    pub fn force_kill(&self) -> bool {
        let current = self.current.lock();
        let Some(pid) = current.as_ref().and_then(|running| running.pid) else {
            return false;
        };
        tracing::debug!(pid, "force killing script process");
        kill_pid(pid)
    }

    pub fn current(&self) -> Option<RunningProcess> {
        self.current.lock().clone()
    }

    pub fn is_occupied(&self) -> bool {
        self.current.lock().is_some()
    }
}

#[cfg(unix)]
fn kill_pid(pid: u32) -> bool {
    // Safety: the slot still holds the pid, so the child has not been reaped.
    unsafe { libc::kill(pid as libc::pid_t, libc::SIGKILL) == 0 }
}

#[cfg(not(unix))]
fn kill_pid(_pid: u32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_and_release_once() {
        let slot = ProcessSlot::new();
        let run_id = slot.occupy(CancellationToken::new()).unwrap();

        assert!(slot.is_occupied());
        assert!(slot.release(run_id));
        assert!(!slot.release(run_id));
        assert!(!slot.is_occupied());
    }

    #[test]
    fn test_single_occupancy() {
        let slot = ProcessSlot::new();
        let run_id = slot.occupy(CancellationToken::new()).unwrap();
        slot.attach_pid(run_id, Some(10));

        let second = slot.occupy(CancellationToken::new());
        assert!(matches!(second, Err(ExecutionError::AlreadyRunning(Some(10)))));
    }

    #[test]
    fn test_reserved_slot_rejects_before_pid() {
        let slot = ProcessSlot::new();
        slot.occupy(CancellationToken::new()).unwrap();

        let second = slot.occupy(CancellationToken::new());
        assert!(matches!(second, Err(ExecutionError::AlreadyRunning(None))));
    }

    #[test]
    fn test_attach_pid_ignores_stale_run() {
        let slot = ProcessSlot::new();
        let first = slot.occupy(CancellationToken::new()).unwrap();
        slot.release(first);
        let second = slot.occupy(CancellationToken::new()).unwrap();

        slot.attach_pid(first, Some(3));
        assert_eq!(slot.current().and_then(|r| r.pid), None);
        slot.attach_pid(second, Some(4));
        assert_eq!(slot.current().and_then(|r| r.pid), Some(4));
    }

    #[test]
    fn test_stale_release_is_noop() {
        let slot = ProcessSlot::new();
        let first = slot.occupy(CancellationToken::new()).unwrap();
        slot.release(first);
        let second = slot.occupy(CancellationToken::new()).unwrap();

        assert!(!slot.release(first));
        assert_eq!(slot.current().map(|r| r.run_id), Some(second));
    }

    #[test]
    fn test_cleanup_cancels_token() {
        let slot = ProcessSlot::new();
        let token = CancellationToken::new();
        let run_id = slot.occupy(token.clone()).unwrap();
        slot.attach_pid(run_id, Some(7));

        assert!(slot.cleanup());
        assert!(token.is_cancelled());
        assert!(slot.current().unwrap().is_cancelled());

        // Cleanup leaves the slot to the resolver
        assert!(slot.is_occupied());
        assert!(slot.release(run_id));
    }

    #[test]
    fn test_cleanup_on_empty_slot() {
        let slot = ProcessSlot::new();
        assert!(!slot.cleanup());
        assert!(!slot.force_kill());
    }

    #[test]
    fn test_force_kill_without_pid() {
        let slot = ProcessSlot::new();
        slot.occupy(CancellationToken::new()).unwrap();
        assert!(!slot.force_kill());
    }
}
