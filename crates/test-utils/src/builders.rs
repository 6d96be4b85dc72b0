#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use actionloop::exec::{Executor, LaunchOptions, LogSinks};
use tempfile::TempDir;

/// Absolute path, the action environment carries no `PATH`.
pub const SH: &str = "/bin/sh";

/// Reads request lines and echoes each one back on the output channel.
pub const PASSTHROUGH: &str = r#"while IFS= read -r line; do printf '%s\n' "$line" >&3; done"#;

/// Like [`PASSTHROUGH`], but logs each request to stdout and stderr before
/// answering.
pub const CHATTY_PASSTHROUGH: &str = r#"while IFS= read -r line; do
  printf 'out: %s\n' "$line"
  printf 'err: %s\n' "$line" >&2
  printf '%s\n' "$line" >&3
done"#;

/// Answers exactly one request, then exits.
pub const ONE_SHOT: &str = r#"IFS= read -r line; printf '%s\n' "$line" >&3"#;

/// Never answers.
pub const SILENT: &str = "while IFS= read -r line; do :; done";

/// A pair of log files in a temporary directory.
pub struct TempLogs {
    dir: TempDir,
}

impl TempLogs {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir for logs"),
        }
    }

    pub fn stdout_path(&self) -> PathBuf {
        self.dir.path().join("stdout.log")
    }

    pub fn stderr_path(&self) -> PathBuf {
        self.dir.path().join("stderr.log")
    }

    pub fn sinks(&self) -> LogSinks {
        LogSinks::open(self.stdout_path(), self.stderr_path()).expect("open log sinks")
    }

    pub fn stdout(&self) -> String {
        std::fs::read_to_string(self.stdout_path()).unwrap_or_default()
    }

    pub fn stderr(&self) -> String {
        std::fs::read_to_string(self.stderr_path()).unwrap_or_default()
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

impl Default for TempLogs {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for executors running a `/bin/sh -c` script.
pub struct ScriptExecutorBuilder {
    script: String,
    options: LaunchOptions,
}

impl ScriptExecutorBuilder {
    pub fn new(script: &str) -> Self {
        Self {
            script: script.to_string(),
            options: LaunchOptions::default(),
        }
    }

    pub fn start_timeout(mut self, timeout: Duration) -> Self {
        self.options.start_timeout = timeout;
        self
    }

    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.debug = true;
        self.options.debug_log_path = path.into();
        self
    }

    /// Must be called inside a Tokio runtime.
    pub fn build(self, logs: &TempLogs) -> Executor {
        Executor::new(logs.sinks(), SH, ["-c", self.script.as_str()], &self.options)
            .expect("failed to build executor")
    }
}
