//! Process spawning
//!
//! This module wraps `tokio::process` behind the `Spawner` and `ChildProcess`
//! traits so the lifecycle manager can be driven by fakes in tests.

use crate::error::SpawnError;
use crate::scripts::ScriptEntry;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// What to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl SpawnRequest {
    /// Build the command line for a script: interpreter, script path, then
    /// the extra arguments. An empty interpreter runs the script directly.
    pub fn for_script(interpreter: &[String], script: &ScriptEntry, extra_args: &[String]) -> Self {
        let mut line: Vec<OsString> = interpreter.iter().map(OsString::from).collect();
        line.push(script.path().as_os_str().to_owned());
        line.extend(extra_args.iter().map(OsString::from));

        let program = line.remove(0);
        SpawnRequest {
            program,
            args: line,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

/// Handle to a spawned process
#[async_trait]
pub trait ChildProcess: Send {
    /// OS process id, if still known
    fn id(&self) -> Option<u32>;

    /// Wait for the process to finish.
    ///
    /// Returns the exit code, or `None` when the process was terminated by a
    /// signal. Cancelling the token given at spawn time asks the process to
    /// terminate, and kills it if it is still alive after the grace period.
    async fn wait(&mut self) -> Result<Option<i32>, SpawnError>;

    /// Forcibly terminate the process without waiting for it
    fn start_kill(&mut self) -> Result<(), SpawnError>;
}

/// Starts processes
pub trait Spawner: Send + Sync {
    type Child: ChildProcess;

    /// Spawn `request` with inherited stdio. A token that is already
    /// cancelled yields `SpawnError::Cancelled` instead of a process.
    fn spawn(&self, request: &SpawnRequest, cancel: CancellationToken) -> Result<Self::Child, SpawnError>;
}

/// `Spawner` backed by `tokio::process`
#[derive(Debug, Clone, Copy)]
pub struct TokioSpawner {
    /// How long a cancelled child may take to exit after SIGTERM
    grace: Duration,
}

impl TokioSpawner {
    pub fn new(grace: Duration) -> Self {
        TokioSpawner { grace }
    }
}

impl Default for TokioSpawner {
    fn default() -> Self {
        TokioSpawner::new(Duration::from_millis(100))
    }
}

impl Spawner for TokioSpawner {
    type Child = TokioChild;

    fn spawn(&self, request: &SpawnRequest, cancel: CancellationToken) -> Result<TokioChild, SpawnError> {
        if cancel.is_cancelled() {
            return Err(SpawnError::Cancelled);
        }

        let mut command = Command::new(&request.program);
        command.args(&request.args);

        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }

        // Set up stdio
        command.stdin(Stdio::inherit());
        command.stdout(Stdio::inherit());
        command.stderr(Stdio::inherit());

        // Never leave the child behind if we stop waiting for it
        command.kill_on_drop(true);

        let child = command.spawn()?;
        tracing::debug!(pid = ?child.id(), program = ?request.program, "spawned script process");

        Ok(TokioChild {
            child,
            cancel,
            grace: self.grace,
        })
    }
}

/// A running `tokio::process::Child` tied to its cancellation token
#[derive(Debug)]
pub struct TokioChild {
    child: Child,
    cancel: CancellationToken,
    grace: Duration,
}

impl TokioChild {
    /// Ask the child to exit. On unix this sends SIGTERM so the script can
    /// run its own cleanup; elsewhere there is nothing softer than a kill.
    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        // Safety: `pid` belongs to a child we have not reaped yet.
        let ret = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if ret == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    /// Terminate, then kill if the child outlives the grace period
    async fn shut_down(&mut self) -> Result<Option<i32>, SpawnError> {
        tracing::debug!(pid = ?self.child.id(), "cancellation requested, terminating script process");
        if let Err(e) = self.terminate() {
            // Already exited; the wait below reports its status
            tracing::debug!(error = %e, "terminate after cancellation failed");
        }

        match tokio::time::timeout(self.grace, self.child.wait()).await {
            Ok(status) => exit_code(status),
            Err(_) => {
                tracing::debug!(pid = ?self.child.id(), "script outlived the grace period, killing it");
                if let Err(e) = self.child.start_kill() {
                    tracing::debug!(error = %e, "kill after grace period failed");
                }
                exit_code(self.child.wait().await)
            }
        }
    }
}

/// Exit code of a finished child, `None` when a signal ended it
fn exit_code(status: io::Result<ExitStatus>) -> Result<Option<i32>, SpawnError> {
    Ok(status?.code())
}

#[async_trait]
impl ChildProcess for TokioChild {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> Result<Option<i32>, SpawnError> {
        tokio::select! {
            status = self.child.wait() => exit_code(status),
            _ = self.cancel.cancelled() => self.shut_down().await,
        }
    }

    fn start_kill(&mut self) -> Result<(), SpawnError> {
        self.child.start_kill()?;
        Ok(())
    }
}
