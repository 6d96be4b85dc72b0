// src/driver.rs

//! Line driver: one request line in, one response line out.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::errors::Result;
use crate::exec::ActionBackend;

/// Counters reported when the input is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub interactions: usize,
}

/// Forward every line of `input` to `backend` and write each response,
/// newline-terminated, to `output`.
///
/// Stops at end of input. The first failed interaction is returned as-is;
/// the backend is not stopped here, that is up to the caller.
pub async fn serve_lines<B, R, W>(backend: &mut B, mut input: R, mut output: W) -> Result<ServeSummary>
where
    B: ActionBackend + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut summary = ServeSummary::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            debug!(interactions = summary.interactions, "request input exhausted");
            return Ok(summary);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }

        let result = backend.interact(&line).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(
                    error = %e,
                    exited = backend.exited(),
                    interactions = summary.interactions,
                    "interaction failed"
                );
                return Err(e);
            }
        };

        output.write_all(&response).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        summary.interactions += 1;
    }
}
