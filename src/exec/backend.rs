// src/exec/backend.rs

//! Pluggable action backend abstraction.
//!
//! The line driver talks to an `ActionBackend` instead of an [`Executor`]
//! directly. Production uses the executor; tests can provide a backend that
//! records requests and answers without spawning anything.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::launcher::Executor;

/// What the driver needs from a running action.
pub trait ActionBackend: Send {
    /// Exchange one request for one response (newline excluded).
    fn interact<'a>(
        &'a mut self,
        request: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

    /// Whether the action is known to have exited.
    fn exited(&self) -> bool;

    /// Tear the action down. Must be safe to call repeatedly.
    fn stop(&mut self);
}

impl ActionBackend for Executor {
    fn interact<'a>(
        &'a mut self,
        request: &'a [u8],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(Executor::interact(self, request))
    }

    fn exited(&self) -> bool {
        Executor::exited(self)
    }

    fn stop(&mut self) {
        Executor::stop(self)
    }
}
