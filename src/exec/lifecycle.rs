// src/exec/lifecycle.rs

//! Starting, probing and stopping the action process.

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::errors::{ActuatorError, Result};
use crate::exec::exit_signal::ExitNotifier;
use crate::exec::launcher::Executor;
use crate::types::ExitOutcome;

impl Executor {
    /// Spawn the action and check that it survives the startup grace window.
    ///
    /// - If the spawn itself fails, returns [`ActuatorError::CommandExited`]
    ///   and no exit watcher is started.
    /// - Otherwise a watcher task is spawned that waits for the process and
    ///   fires the exit signal once. If the signal fires before the grace
    ///   window elapses, this also returns [`ActuatorError::CommandExited`];
    ///   if the window elapses first the process is presumed ready.
    ///
    /// A process crashing just after the window is only noticed by the next
    /// [`Executor::interact`].
    pub async fn start(&mut self) -> Result<()> {
        let (Some(mut command), Some(notifier)) = (self.command.take(), self.notifier.take())
        else {
            return Err(ActuatorError::AlreadyStarted);
        };

        debug!("starting action process");
        let spawned = command.spawn();
        // Closes our copies of the child's ends of the pipes, so the
        // output channel reports end-of-stream once the child is gone.
        drop(command);

        let child = match spawned {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "failed to spawn action process");
                return Err(ActuatorError::CommandExited);
            }
        };

        self.pid = child.id();
        debug!(pid = ?self.pid, "action process spawned");

        let (kill_tx, kill_rx) = oneshot::channel();
        self.kill = Some(kill_tx);
        tokio::spawn(watch_exit(child, kill_rx, notifier));

        tokio::select! {
            outcome = self.exit.fired() => {
                warn!(pid = ?self.pid, %outcome, "action process exited during startup");
                Err(ActuatorError::CommandExited)
            }
            _ = sleep(self.start_timeout) => {
                info!(pid = ?self.pid, "action process started");
                Ok(())
            }
        }
    }

    /// Whether the process is known to have exited. Never blocks.
    ///
    /// `false` before [`Executor::start`], after a failed spawn, and while
    /// the watcher has not yet observed termination.
    pub fn exited(&self) -> bool {
        self.exit.has_fired()
    }

    /// How the process terminated, once [`Executor::exited`] is true.
    pub fn exit_outcome(&self) -> Option<ExitOutcome> {
        self.exit.outcome()
    }

    /// OS process id, once spawned.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Kill the process if it is still held, and forget it.
    ///
    /// SIGKILL is sent before returning. Safe in any state and idempotent.
    /// Does not wait for the process to be reaped; [`Executor::exited`]
    /// turns true once the watcher sees it. After `stop`, the executor can
    /// no longer be started or used.
    pub fn stop(&mut self) {
        debug!(pid = ?self.pid, "stopping");
        self.command = None;
        self.notifier = None;

        let Some(kill) = self.kill.take() else {
            return;
        };

        // The watcher reaps before firing, so an unfired signal means the
        // pid still belongs to our child.
        if let Some(pid) = self.pid.filter(|_| !self.exit.has_fired()) {
            if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                warn!(pid, error = %e, "failed to kill action process");
            }
        }

        // Lets the watcher stop waiting even if the signal above failed.
        if kill.send(()).is_err() {
            debug!(pid = ?self.pid, "action process already reaped");
        }
    }

    pub(super) fn is_running(&self) -> bool {
        self.kill.is_some()
    }
}

/// Wait for `child` to terminate, killing it first if asked to (or if the
/// executor went away), then fire the exit signal.
async fn watch_exit(mut child: Child, kill_rx: oneshot::Receiver<()>, notifier: ExitNotifier) {
    let pid = child.id();

    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill_rx => {
            debug!(?pid, "killing action process");
            if let Err(e) = child.start_kill() {
                warn!(?pid, error = %e, "failed to kill action process");
            }
            child.wait().await
        }
    };

    let outcome = match status {
        Ok(status) => ExitOutcome::from(status),
        Err(e) => {
            warn!(?pid, error = %e, "failed to wait for action process");
            ExitOutcome::unknown()
        }
    };

    info!(?pid, %outcome, "action process exited");
    notifier.fire(outcome);
}
