// src/exec/exit_signal.rs

//! One-shot exit signal shared between the exit watcher and the executor.
//!
//! The watcher owns the [`ExitNotifier`] and consumes it when the process
//! terminates, so the signal fires at most once. The executor keeps an
//! [`ExitSignal`] which can be polled without blocking or awaited.

use tokio::sync::watch;

use crate::types::ExitOutcome;

/// Create a connected notifier/signal pair. Nothing has fired yet.
pub fn exit_signal() -> (ExitNotifier, ExitSignal) {
    let (tx, rx) = watch::channel(None);
    (ExitNotifier { tx }, ExitSignal { rx })
}

/// Publishing half. Firing consumes it.
#[derive(Debug)]
pub struct ExitNotifier {
    tx: watch::Sender<Option<ExitOutcome>>,
}

impl ExitNotifier {
    pub fn fire(self, outcome: ExitOutcome) {
        // `send_replace` stores the value even when every receiver is gone.
        self.tx.send_replace(Some(outcome));
    }
}

/// Observing half.
#[derive(Debug, Clone)]
pub struct ExitSignal {
    rx: watch::Receiver<Option<ExitOutcome>>,
}

impl ExitSignal {
    /// Non-blocking: has the process been seen to exit?
    pub fn has_fired(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// The published outcome, if the signal has fired.
    pub fn outcome(&self) -> Option<ExitOutcome> {
        *self.rx.borrow()
    }

    /// Wait until the signal fires.
    ///
    /// If the notifier is dropped without firing (no watcher was ever started)
    /// this never resolves, which keeps a `select!` against a timer honest.
    pub async fn fired(&mut self) -> ExitOutcome {
        match self.rx.wait_for(|v| v.is_some()).await {
            Ok(v) => (*v).unwrap_or_default(),
            Err(_) => std::future::pending::<ExitOutcome>().await,
        }
    }
}
