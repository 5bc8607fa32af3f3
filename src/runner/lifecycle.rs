//! Script process lifecycle
//!
//! `ProcessManager::execute` looks a script up, spawns it with inherited
//! stdio, forwards termination signals while it runs and resolves the run
//! exactly once.

use crate::error::{ExecutionError, ExecutionResult, SpawnError};
use crate::runner::process::{ChildProcess, SpawnRequest, Spawner, TokioSpawner};
use crate::runner::signals::{process_exit, ExitHook, SignalForwarder, SignalSubscription};
use crate::runner::slot::ProcessSlot;
use crate::runner::Context;
use crate::scripts::{find_script, ScriptEntry};
use crate::ui;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How a script run ended, short of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit code 0
    Success,
    /// The process was killed without an exit code
    Terminated,
    /// The run was cancelled before or while starting
    Aborted,
    /// No script with the requested name; nothing was spawned
    NotFound(String),
}

impl Outcome {
    /// Exit code the CLI should surface for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::NotFound(_) => 1,
            _ => 0,
        }
    }
}

/// Runs one script at a time and owns the current-process slot
pub struct ProcessManager<S = TokioSpawner> {
    spawner: S,
    ctx: Context,
    slot: Arc<ProcessSlot>,
    forwarder: Arc<SignalForwarder>,
    forward_signals: bool,
}

impl ProcessManager<TokioSpawner> {
    pub fn new(ctx: Context) -> Self {
        let spawner = TokioSpawner::new(ctx.grace_period);
        ProcessManager::with_spawner(spawner, ctx)
    }
}

impl<S: Spawner> ProcessManager<S> {
    pub fn with_spawner(spawner: S, ctx: Context) -> Self {
        let slot = Arc::new(ProcessSlot::new());
        let forwarder = Arc::new(SignalForwarder::new(slot.clone(), ctx.grace_period, process_exit()));
        ProcessManager {
            spawner,
            ctx,
            slot,
            forwarder,
            forward_signals: true,
        }
    }

    /// Replace what happens after the grace period of a forwarded signal
    pub fn with_exit_hook(mut self, exit: ExitHook) -> Self {
        self.forwarder = Arc::new(SignalForwarder::new(self.slot.clone(), self.ctx.grace_period, exit));
        self
    }

    /// Skip installing OS signal handlers
    pub fn without_signal_forwarding(mut self) -> Self {
        self.forward_signals = false;
        self
    }

    pub fn slot(&self) -> &Arc<ProcessSlot> {
        &self.slot
    }

    pub fn forwarder(&self) -> &Arc<SignalForwarder> {
        &self.forwarder
    }

    /// Cancel the running script, if any. Safe to call repeatedly.
    pub fn cleanup(&self) -> bool {
        self.slot.cleanup()
    }

    /// Run the script called `name` from `registry` with `extra_args`.
    pub async fn execute(
        &self,
        name: &str,
        registry: &[ScriptEntry],
        extra_args: &[String],
    ) -> ExecutionResult<Outcome> {
        let Some(script) = find_script(registry, name) else {
            self.ctx.print_error(&format!("❌ Script '{}' not found!", name));
            ui::list_scripts(registry);
            return Ok(Outcome::NotFound(name.to_string()));
        };

        self.ctx.print_info(&format!("🚀 Running script: {}", name));

        let request = SpawnRequest::for_script(&self.ctx.interpreter, script, extra_args)
            .with_working_dir(self.ctx.working_dir.clone());
        tracing::debug!(script = name, ?request, "spawning script");

        // Reserve the slot first so a rejected run never starts a process
        let cancel = CancellationToken::new();
        let run_id = self.slot.occupy(cancel.clone())?;

        let mut child = match self.spawner.spawn(&request, cancel) {
            Ok(child) => child,
            Err(e) => {
                self.slot.release(run_id);
                return self.resolve(name, Err(e));
            }
        };
        self.slot.attach_pid(run_id, child.id());

        let subscription = self.subscribe();

        let status = child.wait().await;
        self.slot.release(run_id);
        let result = self.resolve(name, status);

        if let Some(subscription) = subscription {
            subscription.finish().await;
        }

        result
    }

    /// Install signal handlers for the current run
    fn subscribe(&self) -> Option<SignalSubscription> {
        if !self.forward_signals {
            return None;
        }
        match SignalSubscription::install(self.forwarder.clone()) {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                let err = ExecutionError::SignalSetup(e);
                tracing::warn!(error = %err, "running script without signal forwarding");
                self.ctx.print_warn(&err.to_string());
                None
            }
        }
    }

    /// Map the child's terminal event onto an outcome
    fn resolve(&self, name: &str, status: Result<Option<i32>, SpawnError>) -> ExecutionResult<Outcome> {
        match status {
            Ok(Some(0)) => {
                self.ctx
                    .print_success(&format!("✅ Script \"{}\" completed successfully", name));
                Ok(Outcome::Success)
            }
            Ok(None) => {
                self.ctx.print_info("Script execution was terminated");
                Ok(Outcome::Terminated)
            }
            Ok(Some(code)) => {
                self.ctx
                    .print_error(&format!("❌ Script {} failed with code {}", name, code));
                Err(ExecutionError::AbnormalExit {
                    script: name.to_string(),
                    code,
                })
            }
            Err(SpawnError::Cancelled) => {
                self.ctx.print_info("Script execution was aborted");
                Ok(Outcome::Aborted)
            }
            Err(SpawnError::Io(source)) => {
                self.ctx
                    .print_error(&format!("❌ Error running script: {}", source));
                Err(ExecutionError::Spawn {
                    script: name.to_string(),
                    source,
                })
            }
        }
    }
}
