// src/exec/mod.rs

//! Action process execution layer.
//!
//! An [`Executor`] owns a single action process and talks to it with one
//! request line on stdin and one response line on a dedicated descriptor
//! ([`OUTPUT_FD`]) per interaction. The child's stdout/stderr go straight
//! to the [`LogSinks`].
//!
//! - [`launcher`] builds the executor: environment, log wiring, pipes.
//! - [`lifecycle`] starts the process, watches for its exit, stops it.
//! - [`channel`] performs the request/response exchange and writes the
//!   output guard.
//! - [`exit_signal`] is the one-shot "process exited" signal.
//! - [`pipes`] creates the pipes and installs the output descriptor.
//! - [`logs`] holds the log sinks and [`OUTPUT_GUARD`].
//! - [`backend`] is the `ActionBackend` seam used by the line driver, so it
//!   can be exercised without a real process.

pub mod backend;
pub mod channel;
pub mod exit_signal;
pub mod launcher;
pub mod lifecycle;
pub mod logs;
pub mod pipes;

pub use backend::ActionBackend;
pub use exit_signal::{ExitNotifier, ExitSignal};
pub use launcher::{
    Executor, LaunchOptions, API_HOST_ENV, DEBUG_ENV, DEFAULT_DEBUG_LOG_PATH,
    DEFAULT_START_TIMEOUT,
};
pub use logs::{LogSinks, OUTPUT_GUARD};
pub use pipes::OUTPUT_FD;
