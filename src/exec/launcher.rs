// src/exec/launcher.rs

//! Building an [`Executor`]: command, environment, log sinks and pipes.
//! Nothing is spawned here; see [`Executor::start`].

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::unix::pipe;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::debug;

use crate::errors::{ActuatorError, Result};
use crate::exec::exit_signal::{exit_signal, ExitNotifier, ExitSignal};
use crate::exec::logs::LogSinks;
use crate::exec::pipes::{install_output_fd, open_channel_pipes};

/// Endpoint variable copied from our environment into the action's.
pub const API_HOST_ENV: &str = "__OW_API_HOST";

/// Set in the action's environment when debugging is on; points at the
/// file the action should write its own debug log to.
pub const DEBUG_ENV: &str = "OW_DEBUG";

/// How long the process must stay alive during [`Executor::start`].
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_millis(5);

pub const DEFAULT_DEBUG_LOG_PATH: &str = "/tmp/action.log";

/// Launch-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Pass [`DEBUG_ENV`] to the action.
    pub debug: bool,
    pub debug_log_path: PathBuf,
    /// Startup grace window used by [`Executor::start`].
    pub start_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            debug: false,
            debug_log_path: PathBuf::from(DEFAULT_DEBUG_LOG_PATH),
            start_timeout: DEFAULT_START_TIMEOUT,
        }
    }
}

/// Owner of one action process and of the streams used to talk to it.
///
/// Lifecycle: built by [`Executor::new`], spawned by [`Executor::start`],
/// driven by [`Executor::interact`], torn down by [`Executor::stop`].
/// A process is spawned at most once per executor.
#[derive(Debug)]
pub struct Executor {
    /// Present until the process is spawned (or the executor is stopped).
    pub(super) command: Option<Command>,
    pub(super) notifier: Option<ExitNotifier>,

    /// Present while a spawned process may still be running and has not been
    /// stopped. Firing it asks the exit watcher to kill the process.
    pub(super) kill: Option<oneshot::Sender<()>>,
    pub(super) pid: Option<u32>,
    pub(super) exit: ExitSignal,

    pub(super) input: pipe::Sender,
    pub(super) output: BufReader<pipe::Receiver>,
    pub(super) logs: LogSinks,
    pub(super) start_timeout: Duration,
}

impl Executor {
    /// Prepare `command args...` with its logs going to `logs`.
    ///
    /// The action gets a minimal environment: [`API_HOST_ENV`] copied from
    /// ours (empty if unset), plus [`DEBUG_ENV`] when `options.debug` is set.
    ///
    /// Must be called from within a Tokio runtime. Any failure to create the
    /// log handles or pipes is reported as [`ActuatorError::Launch`]; there is
    /// no usable executor in that case.
    pub fn new<S, I, A>(logs: LogSinks, command: S, args: I, options: &LaunchOptions) -> Result<Self>
    where
        S: AsRef<OsStr>,
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let (child_stdout, child_stderr) = logs.child_stdio().map_err(ActuatorError::Launch)?;
        let pipes = open_channel_pipes().map_err(ActuatorError::Launch)?;

        let api_host = std::env::var_os(API_HOST_ENV).unwrap_or_default();

        let mut cmd = Command::new(command.as_ref());
        cmd.args(args)
            .env_clear()
            .env(API_HOST_ENV, &api_host)
            .stdin(pipes.child_stdin)
            .stdout(child_stdout)
            .stderr(child_stderr)
            .kill_on_drop(true);

        if options.debug {
            cmd.env(DEBUG_ENV, &options.debug_log_path);
        }

        debug!(
            command = ?command.as_ref(),
            api_host = ?api_host,
            debug = options.debug,
            "prepared action environment"
        );

        let child_output = pipes.child_output;
        // SAFETY: `install_output_fd` only performs async-signal-safe syscalls.
        unsafe {
            cmd.pre_exec(move || install_output_fd(&child_output));
        }

        let (notifier, exit) = exit_signal();

        Ok(Self {
            command: Some(cmd),
            notifier: Some(notifier),
            kill: None,
            pid: None,
            exit,
            input: pipes.input,
            output: BufReader::new(pipes.output),
            logs,
            start_timeout: options.start_timeout,
        })
    }
}
