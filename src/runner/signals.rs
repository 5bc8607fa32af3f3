//! Signal forwarding
//!
//! While a script runs, SIGINT, SIGTERM and SIGQUIT are caught. The first one
//! cancels the running script, waits a short grace period and then exits the
//! program with a non-zero status. Later signals are ignored.

use crate::runner::slot::ProcessSlot;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Exit status used after a forwarded signal
pub const SIGNAL_EXIT_CODE: i32 = 1;

/// Called with the exit status once the grace period has passed
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Exit hook that terminates the current program
pub fn process_exit() -> ExitHook {
    Arc::new(|code| std::process::exit(code))
}

/// Reacts to termination signals on behalf of one lifecycle manager
pub struct SignalForwarder {
    slot: Arc<ProcessSlot>,
    grace: Duration,
    exit: ExitHook,
    fired: AtomicBool,
    exited: AtomicBool,
}

impl SignalForwarder {
    pub fn new(slot: Arc<ProcessSlot>, grace: Duration, exit: ExitHook) -> Self {
        SignalForwarder {
            slot,
            grace,
            exit,
            fired: AtomicBool::new(false),
            exited: AtomicBool::new(false),
        }
    }

    /// Handle a delivered signal. Returns `true` for the first signal only;
    /// that caller is responsible for the forced exit.
    pub fn handle(&self, signal: &str) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            tracing::debug!(signal, "ignoring repeated signal");
            return false;
        }

        eprintln!("\nReceived {}. Cleaning up...", signal);
        let cancelled = self.slot.cleanup();
        tracing::debug!(signal, cancelled, "signal cleanup done");
        true
    }

    /// Whether a signal has been handled
    pub fn interrupted(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Wait out the grace period, then exit. A script still running at
    /// that point is killed first. The exit hook runs at most once.
    pub async fn exit_after_grace(&self) {
        tokio::time::sleep(self.grace).await;
        if !self.exited.swap(true, Ordering::SeqCst) {
            self.slot.force_kill();
            (self.exit)(SIGNAL_EXIT_CODE);
        }
    }
}

/// Live signal handlers for one script run
pub struct SignalSubscription {
    forwarder: Arc<SignalForwarder>,
    task: Option<JoinHandle<()>>,
}

impl SignalSubscription {
    /// Install the handlers. Must be called inside a tokio runtime.
    pub fn install(forwarder: Arc<SignalForwarder>) -> io::Result<Self> {
        let mut signals = TerminationSignals::new()?;
        let listener = forwarder.clone();

        let task = tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                if listener.handle(signal) {
                    listener.exit_after_grace().await;
                    return;
                }
            }
        });

        Ok(SignalSubscription {
            forwarder,
            task: Some(task),
        })
    }

    pub fn interrupted(&self) -> bool {
        self.forwarder.interrupted()
    }

    /// End the subscription. If a signal was handled, the forced exit still
    /// happens once the grace period is over.
    pub async fn finish(mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        if self.forwarder.interrupted() {
            self.forwarder.exit_after_grace().await;
        }
        task.abort();
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            if !self.forwarder.interrupted() {
                task.abort();
            }
        }
    }
}

/// The termination signals we listen for
#[cfg(unix)]
struct TerminationSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    fn new() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(TerminationSignals {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Next signal name, or `None` once no stream can deliver anymore
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some("SIGINT"),
            Some(()) = self.terminate.recv() => Some("SIGTERM"),
            Some(()) = self.quit.recv() => Some("SIGQUIT"),
            else => None,
        }
    }
}

#[cfg(not(unix))]
struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    fn new() -> io::Result<Self> {
        Ok(TerminationSignals)
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::signal::ctrl_c().await.ok().map(|()| "SIGINT")
    }
}
