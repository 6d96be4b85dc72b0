// src/exec/channel.rs

//! One request/response exchange per call.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, warn};

use crate::errors::{ActuatorError, Result};
use crate::exec::launcher::Executor;

impl Executor {
    /// Send `request` as one line on the action's stdin and return the next
    /// line from the dedicated output channel.
    ///
    /// The returned bytes do **not** include the trailing `\n`. `request` must
    /// not contain a newline itself, or the pairing with responses breaks.
    ///
    /// After the exchange, successful or not, the output guard is appended to
    /// both log sinks. I/O errors, including the channel closing before a full
    /// line arrived (`UnexpectedEof`), are returned as [`ActuatorError::Io`];
    /// nothing is retried.
    ///
    /// Only one call may be in flight per executor. If the future is dropped
    /// midway (e.g. by a caller-side timeout) the streams are out of step and
    /// the executor should be stopped.
    pub async fn interact(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        if !self.is_running() {
            return Err(ActuatorError::NotStarted);
        }

        let exchanged = self.exchange(request).await;

        if let Err(e) = self.logs.write_guard() {
            warn!(error = %e, "failed to write output guard to log sinks");
        }

        match &exchanged {
            Ok(response) => debug!(
                request_len = request.len(),
                response_len = response.len(),
                "interaction complete"
            ),
            Err(e) => warn!(pid = ?self.pid, error = %e, "interaction failed"),
        }

        exchanged.map_err(ActuatorError::Io)
    }

    async fn exchange(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        self.input.write_all(request).await?;
        self.input.write_all(b"\n").await?;
        self.input.flush().await?;

        let mut line = Vec::new();
        self.output.read_until(b'\n', &mut line).await?;

        if line.pop() != Some(b'\n') {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "action closed its output channel before a full response line",
            ));
        }
        Ok(line)
    }
}
