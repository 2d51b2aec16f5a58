use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Handle to one running child process, held by the supervisor loop.
///
/// The handle is the kill side of a process generation: the monitor task
/// owns the actual `Child` and marks the handle exited when the child is
/// reaped. Cloning is cheap; all clones refer to the same generation.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    pid: u32,
    kill_requested: Arc<AtomicBool>,
    exited: Arc<AtomicBool>,
}

impl ProcessHandle {
    pub(crate) fn new(pid: u32) -> Self {
        Self {
            pid,
            kill_requested: Arc::new(AtomicBool::new(false)),
            exited: Arc::new(AtomicBool::new(false)),
        }
    }

    /// OS process ID of this generation
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Whether the child has not yet been observed to exit
    pub fn is_alive(&self) -> bool {
        !self.exited.load(Ordering::SeqCst)
    }

    /// Whether the supervisor requested this generation's termination
    pub fn kill_was_requested(&self) -> bool {
        self.kill_requested.load(Ordering::SeqCst)
    }

    /// Called by the monitor task once the child has been reaped
    pub(crate) fn mark_exited(&self) {
        self.exited.store(true, Ordering::SeqCst);
    }

    /// Forcefully terminate the child (SIGKILL, no grace period).
    ///
    /// Returns `true` if a kill was actually issued. Killing a handle
    /// whose child already exited, or that was already killed, is a
    /// no-op and returns `false`.
    ///
    /// The termination-requested flag is set before the signal is sent,
    /// so the monitor task classifies the resulting exit as
    /// supervisor-induced rather than a failure.
    pub fn kill(&self) -> bool {
        if self.exited.load(Ordering::SeqCst) {
            return false;
        }

        if self.kill_requested.swap(true, Ordering::SeqCst) {
            return false;
        }

        #[cfg(unix)]
        {
            // ESRCH just means the child won the race and exited first
            let _ = kill(Pid::from_raw(self.pid as i32), Signal::SIGKILL);
        }

        true
    }
}
